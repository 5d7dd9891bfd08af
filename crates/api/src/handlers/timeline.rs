use std::net::SocketAddr;

use askgod_domain::TimelineEntry;
use axum::extract::{ConnectInfo, State};
use axum::Json;
use tracing::error;

use crate::access::Viewer;
use crate::response::ApiError;
use crate::state::AppState;

pub async fn get_timeline(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
    let timeline = state.scores.get_timeline().await.map_err(|err| {
        error!(error = %err, "Failed to get the timeline");
        ApiError::internal()
    })?;

    let config = state.config.load();
    let hide_others = config.editable.scoring.hide_others;
    let hidden = config.hidden_team_ids();

    let viewer = Viewer::resolve(&state, addr).await;

    Ok(Json(
        timeline
            .into_iter()
            .filter(|entry| viewer.sees_team(entry.team.id, hide_others, &hidden))
            .collect(),
    ))
}
