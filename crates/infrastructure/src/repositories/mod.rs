pub mod config_repository;
pub mod flag_repository;
pub mod score_repository;
pub mod team_repository;

pub use config_repository::PgConfigRepository;
pub use flag_repository::PgFlagRepository;
pub use score_repository::PgScoreRepository;
pub use team_repository::PgTeamRepository;

use askgod_domain::StoreError;

/// Translate sqlx errors into the store's error kinds.
pub(crate) fn map_db_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) => match db.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                StoreError::Conflict("Record already exists".to_string())
            }
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                StoreError::Conflict("Referenced record does not exist".to_string())
            }
            _ => StoreError::Database(err.to_string()),
        },
        _ => StoreError::Database(err.to_string()),
    }
}
