pub mod schema;

use askgod_domain::config::DatabaseConfig;
use askgod_domain::StoreError;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

fn connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.name)
        .ssl_mode(if cfg.tls {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        })
}

/// Connect to the database, bringing the schema up to date.
///
/// Migration runs on a dedicated single-connection pool so no other client
/// observes a half-migrated schema; the returned pool is capped at
/// `database.connections`.
pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, StoreError> {
    info!(
        host = %cfg.host,
        username = %cfg.username,
        database = %cfg.name,
        connections = cfg.connections,
        "Connecting to the database"
    );

    let options = connect_options(cfg);

    let setup_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options.clone())
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

    schema::ensure_schema(&setup_pool).await?;
    setup_pool.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.connections)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

    Ok(pool)
}
