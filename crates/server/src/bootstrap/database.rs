use askgod_domain::config::DatabaseConfig;
use askgod_infrastructure::database;
use sqlx::PgPool;
use tracing::error;

pub async fn init_database(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    database::connect(cfg).await.map_err(|err| {
        error!(error = %err, "Failed to initialize the database");
        anyhow::anyhow!(err)
    })
}
