pub mod config;
pub mod events;
pub mod flags;
pub mod root;
pub mod scoreboard;
pub mod scores;
pub mod status;
pub mod team;
pub mod team_flags;
pub mod teams;
pub mod timeline;

use axum::response::{IntoResponse, Response};

use crate::response::ApiError;

/// Fallback for methods a route does not implement.
pub async fn not_implemented() -> Response {
    ApiError::not_implemented().into_response()
}
