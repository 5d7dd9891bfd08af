use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("The flag was already submitted")]
    AlreadySubmitted,

    #[error("No configuration in database")]
    EmptyConfig,

    #[error("More than one team for client IP")]
    AmbiguousTeam,

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),
}
