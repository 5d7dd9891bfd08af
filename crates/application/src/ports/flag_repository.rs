use askgod_domain::{AdminFlag, AdminFlagPost, AdminFlagPut, StoreError};
use async_trait::async_trait;

/// Data access for flag definitions.
#[async_trait]
pub trait FlagRepository: Send + Sync {
    async fn get_flags(&self) -> Result<Vec<AdminFlag>, StoreError>;

    /// Returns `StoreError::NotFound` if no flag with this id exists.
    async fn get_flag(&self, id: i64) -> Result<AdminFlag, StoreError>;

    /// Create a flag and return its server-assigned id. The flag string is
    /// unique; a duplicate maps to `StoreError::Conflict`.
    async fn create_flag(&self, flag: &AdminFlagPost) -> Result<i64, StoreError>;

    async fn update_flag(&self, id: i64, flag: &AdminFlagPut) -> Result<(), StoreError>;

    async fn delete_flag(&self, id: i64) -> Result<(), StoreError>;

    /// Remove every flag and reset the id sequence.
    async fn clear_flags(&self) -> Result<(), StoreError>;
}
