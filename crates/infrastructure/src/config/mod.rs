//! Live configuration management.
//!
//! The YAML file is parsed once at startup; the editable sections are then
//! overlaid from the database (seeding it on first boot). The merged config
//! is published through an atomic pointer swap so readers never block, and
//! every change is fanned out to subscribers.

pub mod watcher;

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use askgod_application::ports::ConfigRepository;
use askgod_application::SharedConfig;
use askgod_domain::{Config, ConfigPut, StoreError};
use tokio::sync::broadcast;
use tracing::info;

pub struct ConfigManager {
    pub(crate) path: PathBuf,
    handle: SharedConfig,
    store: Arc<dyn ConfigRepository>,
    changes: broadcast::Sender<Arc<Config>>,
}

impl ConfigManager {
    /// Wrap an already-parsed configuration. The caller typically creates
    /// the handle before the database is up (the log pipeline needs it) and
    /// calls [`ConfigManager::merge_store`] once it is.
    pub fn new(handle: SharedConfig, path: PathBuf, store: Arc<dyn ConfigRepository>) -> Arc<Self> {
        let (changes, _) = broadcast::channel(16);

        Arc::new(Self {
            path,
            handle,
            store,
            changes,
        })
    }

    /// Parse the configuration file and merge in the persisted editable
    /// sections. On first boot the database is seeded from the file instead.
    pub async fn load(
        path: PathBuf,
        store: Arc<dyn ConfigRepository>,
    ) -> Result<Arc<Self>, StoreError> {
        info!(path = %path.display(), "Parsing configuration");

        let config = Config::from_file(&path)?;
        let manager = Self::new(Arc::new(ArcSwap::from_pointee(config)), path, store);
        manager.merge_store().await?;

        Ok(manager)
    }

    /// Overlay the persisted editable sections onto the current config, or
    /// seed the store from it when the database is still empty.
    pub async fn merge_store(&self) -> Result<(), StoreError> {
        match self.store.get_config().await {
            Ok(stored) => {
                let mut config = (*self.current()).clone();
                config.editable = stored;
                self.swap(config);
            }
            Err(StoreError::EmptyConfig) => {
                info!("Empty database configuration, seeding from file");
                self.store.update_config(&self.current().editable).await?;
            }
            Err(err) => return Err(err),
        }

        Ok(())
    }

    /// The lock-free handle shared with every reader.
    pub fn handle(&self) -> SharedConfig {
        self.handle.clone()
    }

    pub fn current(&self) -> Arc<Config> {
        self.handle.load_full()
    }

    /// Receive every future config snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Config>> {
        self.changes.subscribe()
    }

    fn swap(&self, config: Config) -> Arc<Config> {
        let config = Arc::new(config);
        self.handle.store(config.clone());
        let _ = self.changes.send(config.clone());
        config
    }

    /// Re-apply the persisted editable sections. Driven by `internal`
    /// events when another cluster member edits the config.
    pub async fn reload_from_store(&self) -> Result<Arc<Config>, StoreError> {
        let stored = self.store.get_config().await?;

        let mut config = (*self.current()).clone();
        config.editable = stored;

        info!("Config updated from database");
        Ok(self.swap(config))
    }

    /// Persist a new editable config and publish the merged result.
    pub async fn update_editable(&self, put: ConfigPut) -> Result<Arc<Config>, StoreError> {
        self.store.update_config(&put).await?;

        let mut config = (*self.current()).clone();
        config.editable = put;

        Ok(self.swap(config))
    }

    /// Re-read the YAML file, keeping the database authoritative for the
    /// editable sections. Returns true when the effective config changed.
    pub async fn reload_from_file(&self) -> Result<bool, StoreError> {
        let mut config = Config::from_file(&self.path)?;

        match self.store.get_config().await {
            Ok(stored) => config.editable = stored,
            Err(StoreError::EmptyConfig) => {}
            Err(err) => return Err(err),
        }

        let old = serde_yaml::to_string(&*self.current()).unwrap_or_default();
        let new = serde_yaml::to_string(&config).unwrap_or_default();

        if old == new {
            return Ok(false);
        }

        info!(path = %self.path.display(), "Configuration file changed, reloading");
        self.swap(config);
        Ok(true)
    }
}
