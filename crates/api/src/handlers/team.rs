use std::net::SocketAddr;

use askgod_domain::{
    validators, AdminTeamPut, EventTimeline, EventType, StoreError, Team, TeamPut,
    TimelineEventType,
};
use axum::extract::{ConnectInfo, State};
use axum::Json;
use tracing::{error, info, warn};

use crate::response::ApiError;
use crate::state::AppState;

fn team_lookup_error(err: StoreError, ip: std::net::IpAddr) -> ApiError {
    match err {
        StoreError::NotFound => {
            warn!(client = %ip, "No team found for IP");
            ApiError::not_found("No team found for IP")
        }
        err => {
            error!(error = %err, "Failed to get the team");
            ApiError::internal()
        }
    }
}

pub async fn get_team(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<Team>, ApiError> {
    let record = state
        .teams
        .get_team_for_ip(addr.ip())
        .await
        .map_err(|err| team_lookup_error(err, addr.ip()))?;

    Ok(Json(record.member_view()))
}

pub async fn update_team(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(mut new_team): Json<TeamPut>,
) -> Result<(), ApiError> {
    let config = state.config.load();

    if !config.editable.teams.self_register {
        warn!(client = %addr.ip(), "Unauthorized attempt to self-register");
        return Err(ApiError {
            status: axum::http::StatusCode::FORBIDDEN,
            message: "Team self-registration disabled".to_string(),
        });
    }

    validators::validate_team_name(&new_team.name)?;
    validators::validate_team_country(&new_team.country)?;
    new_team.website = validators::validate_team_website(&new_team.website)?;

    let team = state
        .teams
        .get_team_for_ip(addr.ip())
        .await
        .map_err(|err| team_lookup_error(err, addr.ip()))?;

    // Without self-update, fields only transition from empty to set.
    if !config.editable.teams.self_update {
        if !team.name.is_empty() && team.name != new_team.name {
            return Err(ApiError::bad_request("Team name is already set"));
        }

        if !team.country.is_empty() && team.country != new_team.country {
            return Err(ApiError::bad_request("Team country is already set"));
        }

        if !team.website.is_empty() && team.website != new_team.website {
            return Err(ApiError::bad_request("Team website is already set"));
        }
    }

    let record = AdminTeamPut {
        name: new_team.name.clone(),
        country: new_team.country.clone(),
        website: new_team.website.clone(),
        notes: team.notes.clone(),
        subnets: team.subnets.clone(),
        tags: team.tags.clone(),
    };

    state.teams.update_team(team.id, &record).await.map_err(|err| {
        error!(error = %err, "Failed to update the team");
        ApiError::internal()
    })?;

    state.bus.publish(
        EventType::Timeline,
        &EventTimeline {
            teamid: team.id,
            team: Some(new_team.clone()),
            score: None,
            change: TimelineEventType::TeamUpdated,
        },
    );

    info!(
        id = team.id,
        name = %new_team.name,
        country = %new_team.country,
        website = %new_team.website,
        "Team updated"
    );
    Ok(())
}
