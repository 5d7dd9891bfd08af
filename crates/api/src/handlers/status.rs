use std::net::SocketAddr;

use askgod_application::Role;
use askgod_domain::{Status, StatusFlags};
use axum::extract::{ConnectInfo, State};
use axum::Json;

use crate::state::AppState;

pub async fn get_status(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Json<Status> {
    let config = state.config.load();
    let ip = addr.ip();

    Json(Status {
        is_admin: state.access.allowed(ip, Role::Admin),
        is_team: state.access.allowed(ip, Role::Team),
        is_guest: state.access.allowed(ip, Role::Guest),
        event_name: config.editable.scoring.event_name.clone(),
        flags: StatusFlags {
            team_self_register: config.editable.teams.self_register,
            team_self_update: config.editable.teams.self_update,
            board_read_only: config.editable.scoring.read_only,
            board_hide_others: config.editable.scoring.hide_others,
        },
    })
}
