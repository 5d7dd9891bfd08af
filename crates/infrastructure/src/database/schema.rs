//! Versioned schema management.
//!
//! The `schema` table records every applied update; its highest `version` is
//! the current schema. An empty database is initialized straight to the
//! latest schema, an existing one replays only the updates it is missing.

use askgod_domain::StoreError;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS flag (
    id BIGSERIAL PRIMARY KEY,
    flag VARCHAR,
    value BIGINT NOT NULL DEFAULT 0,
    return_string VARCHAR,
    description VARCHAR,
    tags VARCHAR,
    UNIQUE(flag)
);

CREATE TABLE IF NOT EXISTS team (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    country VARCHAR(2),
    website VARCHAR(255),
    notes VARCHAR,
    subnets VARCHAR,
    tags VARCHAR
);

CREATE TABLE IF NOT EXISTS score (
    id BIGSERIAL PRIMARY KEY,
    team_id BIGINT NOT NULL,
    flag_id BIGINT NOT NULL,
    value BIGINT NOT NULL DEFAULT 0,
    submit_time TIMESTAMP WITH TIME ZONE,
    notes VARCHAR,
    FOREIGN KEY (team_id) REFERENCES team (id) ON DELETE CASCADE,
    FOREIGN KEY (flag_id) REFERENCES flag (id) ON DELETE CASCADE,
    UNIQUE(team_id, flag_id)
);

CREATE TABLE IF NOT EXISTS config (
    id BIGSERIAL PRIMARY KEY,
    key VARCHAR,
    value VARCHAR,
    UNIQUE(key)
);

CREATE TABLE IF NOT EXISTS schema (
    id BIGSERIAL PRIMARY KEY,
    version INTEGER,
    updated_at TIMESTAMP WITH TIME ZONE,
    UNIQUE(version)
);
";

struct SchemaUpdate {
    version: i32,
    statements: &'static [&'static str],
}

/// Updates to replay on databases created before the statement was part of
/// the base schema, oldest first.
const UPDATES: &[SchemaUpdate] = &[SchemaUpdate {
    version: 1,
    statements: &["ALTER TABLE team ADD COLUMN IF NOT EXISTS tags VARCHAR;"],
}];

fn latest_version() -> i32 {
    UPDATES.last().map(|u| u.version).unwrap_or(0)
}

/// Current schema version, `None` when the ledger has no rows yet.
async fn current_version(pool: &PgPool) -> Result<Option<i32>, sqlx::Error> {
    let row: (Option<i32>,) = sqlx::query_as("SELECT max(version) FROM schema;")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    match current_version(pool).await {
        Ok(Some(current)) => apply_updates(pool, current).await,
        // Missing table or empty ledger: assume an empty database.
        Ok(None) | Err(_) => create_database(pool).await,
    }
}

async fn create_database(pool: &PgPool) -> Result<(), StoreError> {
    info!("Creating initial database schema");

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

    for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
    }

    sqlx::query("INSERT INTO schema (version, updated_at) VALUES ($1, $2);")
        .bind(latest_version())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| StoreError::Database(e.to_string()))
}

async fn apply_updates(pool: &PgPool, mut current: i32) -> Result<(), StoreError> {
    for update in UPDATES {
        if update.version <= current {
            continue;
        }

        info!(current, update = update.version, "Updating DB schema");

        for statement in update.statements {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        sqlx::query("INSERT INTO schema (version, updated_at) VALUES ($1, $2);")
            .bind(update.version)
            .bind(Utc::now())
            .execute(pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        current = update.version;
    }

    Ok(())
}
