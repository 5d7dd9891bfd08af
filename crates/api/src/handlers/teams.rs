use std::collections::HashMap;

use askgod_domain::{
    AdminTeam, AdminTeamPost, AdminTeamPut, EventTimeline, EventType, TeamPut, TimelineEventType,
};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{info, warn};

use crate::response::ApiError;
use crate::state::AppState;

fn team_put(team: &AdminTeamPut) -> TeamPut {
    TeamPut {
        name: team.name.clone(),
        country: team.country.clone(),
        website: team.website.clone(),
    }
}

fn publish_team_change(
    state: &AppState,
    teamid: i64,
    team: Option<TeamPut>,
    change: TimelineEventType,
) {
    state.bus.publish(
        EventType::Timeline,
        &EventTimeline {
            teamid,
            team,
            score: None,
            change,
        },
    );
}

pub async fn get_teams(State(state): State<AppState>) -> Result<Json<Vec<AdminTeam>>, ApiError> {
    Ok(Json(state.teams.get_teams().await?))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AdminTeam>, ApiError> {
    Ok(Json(state.teams.get_team(id).await?))
}

/// Create one team, or a JSON array of teams with `?bulk=1`.
pub async fn create_team(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(), ApiError> {
    let bulk = query.get("bulk").map(String::as_str) == Some("1");

    let teams: Vec<AdminTeamPost> = if bulk {
        serde_json::from_value(body).map_err(|err| {
            warn!(error = %err, "Malformed JSON provided");
            ApiError::bad_request("Malformed JSON provided")
        })?
    } else {
        let team = serde_json::from_value(body).map_err(|err| {
            warn!(error = %err, "Malformed JSON provided");
            ApiError::bad_request("Malformed JSON provided")
        })?;
        vec![team]
    };

    for team in &teams {
        let id = state.teams.create_team(team).await?;

        publish_team_change(&state, id, Some(team_put(team)), TimelineEventType::TeamAdded);
        info!(id, subnets = %team.subnets, "New team defined");
    }

    Ok(())
}

pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(team): Json<AdminTeamPut>,
) -> Result<(), ApiError> {
    state.teams.update_team(id, &team).await?;

    publish_team_change(&state, id, Some(team_put(&team)), TimelineEventType::TeamUpdated);
    info!(id, name = %team.name, "Team updated");
    Ok(())
}

pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(), ApiError> {
    state.teams.delete_team(id).await?;

    publish_team_change(&state, id, None, TimelineEventType::TeamRemoved);
    info!(id, "Team deleted");
    Ok(())
}

/// Truncate the team table; requires `?empty=1` as confirmation.
pub async fn clear_teams(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(), ApiError> {
    if query.get("empty").map(String::as_str) != Some("1") {
        warn!("Teams clear requested without empty=1");
        return Err(ApiError::bad_request(
            "Teams clear requested without empty=1",
        ));
    }

    state.teams.clear_teams().await?;

    publish_team_change(&state, 0, None, TimelineEventType::Reload);
    info!("All teams deleted");
    Ok(())
}
