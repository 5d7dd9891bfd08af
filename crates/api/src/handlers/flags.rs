use std::collections::HashMap;

use askgod_domain::{AdminFlag, AdminFlagPost, AdminFlagPut};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{info, warn};

use crate::response::ApiError;
use crate::state::AppState;

pub async fn get_flags(State(state): State<AppState>) -> Result<Json<Vec<AdminFlag>>, ApiError> {
    Ok(Json(state.flags.get_flags().await?))
}

pub async fn get_flag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AdminFlag>, ApiError> {
    Ok(Json(state.flags.get_flag(id).await?))
}

/// Create one flag, or a JSON array of flags with `?bulk=1`.
pub async fn create_flag(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(), ApiError> {
    let bulk = query.get("bulk").map(String::as_str) == Some("1");

    let flags: Vec<AdminFlagPost> = if bulk {
        serde_json::from_value(body).map_err(|err| {
            warn!(error = %err, "Malformed JSON provided");
            ApiError::bad_request("Malformed JSON provided")
        })?
    } else {
        let flag = serde_json::from_value(body).map_err(|err| {
            warn!(error = %err, "Malformed JSON provided");
            ApiError::bad_request("Malformed JSON provided")
        })?;
        vec![flag]
    };

    for flag in &flags {
        let id = state.flags.create_flag(flag).await?;
        info!(id, flag = %flag.flag, value = flag.value, "New flag defined");
    }

    Ok(())
}

pub async fn update_flag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(flag): Json<AdminFlagPut>,
) -> Result<(), ApiError> {
    state.flags.update_flag(id, &flag).await?;

    info!(id, flag = %flag.flag, value = flag.value, "Flag updated");
    Ok(())
}

pub async fn delete_flag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(), ApiError> {
    state.flags.delete_flag(id).await?;

    info!(id, "Flag deleted");
    Ok(())
}

/// Truncate the flag table; requires `?empty=1` as confirmation.
pub async fn clear_flags(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(), ApiError> {
    if query.get("empty").map(String::as_str) != Some("1") {
        warn!("Flags clear requested without empty=1");
        return Err(ApiError::bad_request("Flags clear requested without empty=1"));
    }

    state.flags.clear_flags().await?;

    info!("All flags deleted");
    Ok(())
}
