use std::collections::HashMap;

use askgod_application::ports::ConfigRepository;
use askgod_domain::{ConfigPut, StoreError};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::map_db_error;

pub struct PgConfigRepository {
    pool: PgPool,
}

impl PgConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flatten the editable configuration into `(key, value)` rows. Booleans are
/// stored as `"true"`/`"false"`, lists comma-joined.
fn config_to_rows(config: &ConfigPut) -> Vec<(&'static str, String)> {
    vec![
        ("scoring.event_name", config.scoring.event_name.clone()),
        ("scoring.hide_others", config.scoring.hide_others.to_string()),
        ("scoring.read_only", config.scoring.read_only.to_string()),
        ("scoring.public_tags", config.scoring.public_tags.join(",")),
        ("teams.self_register", config.teams.self_register.to_string()),
        ("teams.self_update", config.teams.self_update.to_string()),
        ("teams.hidden", config.teams.hidden.join(",")),
        ("subnets.admins", config.subnets.admins.join(",")),
        ("subnets.teams", config.subnets.teams.join(",")),
        ("subnets.guests", config.subnets.guests.join(",")),
    ]
}

fn rows_to_config(rows: &HashMap<String, String>) -> ConfigPut {
    let get = |key: &str| rows.get(key).cloned().unwrap_or_default();
    let get_bool = |key: &str| rows.get(key).map(|v| v == "true").unwrap_or(false);
    let get_list = |key: &str| split_list(&get(key));

    let mut config = ConfigPut::default();
    config.scoring.event_name = get("scoring.event_name");
    config.scoring.hide_others = get_bool("scoring.hide_others");
    config.scoring.read_only = get_bool("scoring.read_only");
    config.scoring.public_tags = get_list("scoring.public_tags");
    config.teams.self_register = get_bool("teams.self_register");
    config.teams.self_update = get_bool("teams.self_update");
    config.teams.hidden = get_list("teams.hidden");
    config.subnets.admins = get_list("subnets.admins");
    config.subnets.teams = get_list("subnets.teams");
    config.subnets.guests = get_list("subnets.guests");
    config
}

fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }

    value.split(',').map(|s| s.trim().to_string()).collect()
}

#[async_trait]
impl ConfigRepository for PgConfigRepository {
    #[instrument(skip(self))]
    async fn get_config(&self) -> Result<ConfigPut, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM config;")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        if rows.is_empty() {
            return Err(StoreError::EmptyConfig);
        }

        Ok(rows_to_config(&rows.into_iter().collect()))
    }

    #[instrument(skip(self, config))]
    async fn update_config(&self, config: &ConfigPut) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM config;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        for (key, value) in config_to_rows(config) {
            sqlx::query("INSERT INTO config (key, value) VALUES ($1, $2);")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)
    }
}
