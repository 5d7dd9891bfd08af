use std::net::SocketAddr;

use askgod_domain::{validators, Flag, FlagPost, FlagPut, StoreError};
use axum::extract::{ConnectInfo, Path, State};
use axum::Json;
use tracing::{error, warn};

use crate::response::ApiError;
use crate::state::AppState;

async fn own_team(state: &AppState, addr: SocketAddr) -> Result<askgod_domain::AdminTeam, ApiError> {
    state.teams.get_team_for_ip(addr.ip()).await.map_err(|err| match err {
        StoreError::NotFound => {
            warn!(client = %addr.ip(), "No team found for IP");
            ApiError::not_found("No team found for IP")
        }
        err => {
            error!(error = %err, "Failed to get the team");
            ApiError::internal()
        }
    })
}

pub async fn get_team_flags(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<Vec<Flag>>, ApiError> {
    let team = own_team(&state, addr).await?;

    let flags = state.scores.get_team_flags(team.id).await.map_err(|err| {
        error!(error = %err, teamid = team.id, "Failed to query the flag list");
        ApiError::internal()
    })?;

    Ok(Json(flags))
}

pub async fn get_team_flag(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
) -> Result<Json<Flag>, ApiError> {
    let team = own_team(&state, addr).await?;

    let flag = state
        .scores
        .get_team_flag(team.id, id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(flag))
}

pub async fn update_team_flag(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(id): Path<i64>,
    Json(flag): Json<FlagPut>,
) -> Result<(), ApiError> {
    validators::validate_notes(&flag.notes)?;

    let team = own_team(&state, addr).await?;

    state
        .scores
        .update_team_flag(team.id, id, &flag)
        .await
        .map_err(ApiError::from)?;

    Ok(())
}

/// Flag submission: the scoring hot path.
pub async fn submit_team_flag(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Flag>, ApiError> {
    let flag: FlagPost = serde_json::from_value(body).map_err(|err| {
        warn!(error = %err, "Malformed JSON provided");
        ApiError::bad_request("Malformed JSON provided")
    })?;

    let record = state.submission.submit(addr.ip(), flag).await?;

    Ok(Json(record))
}
