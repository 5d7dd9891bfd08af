use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DaemonConfig, DatabaseConfig, ScoringConfig, SubnetsConfig, TeamsConfig};
use crate::errors::StoreError;

/// The runtime-editable part of the configuration. This is what the admin
/// API accepts and what gets persisted to the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPut {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub teams: TeamsConfig,

    #[serde(default)]
    pub subnets: SubnetsConfig,
}

/// The full configuration. `daemon` and `database` only ever come from the
/// YAML file; `editable` is seeded from YAML on first boot and owned by the
/// database afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub editable: ConfigPut,

    #[serde(default)]
    pub daemon: DaemonConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Parse the YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            StoreError::InvalidInput(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.database.driver != "postgres" {
            return Err(StoreError::InvalidInput(format!(
                "Database driver not supported: {}",
                self.database.driver
            )));
        }

        if self.daemon.https_port != 0
            && (self.daemon.https_certificate.is_empty() || self.daemon.https_key.is_empty())
        {
            return Err(StoreError::InvalidInput(
                "HTTPS requires a certificate and key".to_string(),
            ));
        }

        Ok(())
    }

    /// A copy safe to hand to API clients: secrets replaced with "*****".
    pub fn masked(&self) -> Config {
        let mut masked = self.clone();

        if !masked.daemon.https_certificate.is_empty() {
            masked.daemon.https_certificate = "*****".to_string();
        }

        if !masked.daemon.https_key.is_empty() {
            masked.daemon.https_key = "*****".to_string();
        }

        if !masked.database.password.is_empty() {
            masked.database.password = "*****".to_string();
        }

        masked
    }

    /// Hidden team ids parsed out of `teams.hidden`, ignoring garbage.
    pub fn hidden_team_ids(&self) -> Vec<i64> {
        self.editable
            .teams
            .hidden
            .iter()
            .filter_map(|entry| entry.trim().parse().ok())
            .collect()
    }
}
