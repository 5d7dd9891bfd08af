use std::collections::HashMap;

use askgod_domain::{AdminScore, AdminScorePost, AdminScorePut};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{error, warn};

use crate::response::ApiError;
use crate::state::AppState;

pub async fn get_scores(State(state): State<AppState>) -> Result<Json<Vec<AdminScore>>, ApiError> {
    Ok(Json(state.scores.get_scores().await?))
}

pub async fn get_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AdminScore>, ApiError> {
    Ok(Json(state.scores.get_score(id).await?))
}

/// Create one score row, or a JSON array with `?bulk=1`. All mutations run
/// through the submission engine so events and totals stay consistent.
pub async fn create_score(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(), ApiError> {
    let bulk = query.get("bulk").map(String::as_str) == Some("1");

    if bulk {
        let scores: Vec<AdminScorePost> = serde_json::from_value(body).map_err(|err| {
            warn!(error = %err, "Malformed JSON provided");
            ApiError::bad_request("Malformed JSON provided")
        })?;

        state.submission.admin_create_scores(scores).await?;
    } else {
        let score: AdminScorePost = serde_json::from_value(body).map_err(|err| {
            warn!(error = %err, "Malformed JSON provided");
            ApiError::bad_request("Malformed JSON provided")
        })?;

        // Inserting a second row for the same (team, flag) trips the unique
        // constraint and surfaces as a 500.
        state.submission.admin_create_score(score).await.map_err(|err| {
            error!(error = %err, "Failed to create the score");
            ApiError::internal()
        })?;
    }

    Ok(())
}

pub async fn update_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(score): Json<AdminScorePut>,
) -> Result<(), ApiError> {
    state.submission.admin_update_score(id, score).await?;

    Ok(())
}

pub async fn delete_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(), ApiError> {
    state.submission.admin_delete_score(id).await?;

    Ok(())
}

/// Truncate the score table; requires `?empty=1` as confirmation.
pub async fn clear_scores(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(), ApiError> {
    if query.get("empty").map(String::as_str) != Some("1") {
        warn!("Scores clear requested without empty=1");
        return Err(ApiError::bad_request(
            "Scores clear requested without empty=1",
        ));
    }

    state.submission.admin_clear_scores().await?;

    Ok(())
}
