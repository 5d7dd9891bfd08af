use askgod_domain::{ConfigPut, StoreError};
use async_trait::async_trait;

/// Data access for the persisted, runtime-editable configuration.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Returns `StoreError::EmptyConfig` when no rows exist yet (first boot).
    async fn get_config(&self) -> Result<ConfigPut, StoreError>;

    /// Replace the stored configuration in a single transaction.
    async fn update_config(&self, config: &ConfigPut) -> Result<(), StoreError>;
}
