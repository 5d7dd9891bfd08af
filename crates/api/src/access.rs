//! Per-route role enforcement and viewer identity.

use std::net::SocketAddr;

use askgod_application::Role;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

/// Middleware guarding a group of routes behind a minimum role.
pub async fn guard(
    State((state, role)): State<(AppState, Role)>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.access.allowed(addr.ip(), role) {
        warn!(
            method = %request.method(),
            url = %request.uri(),
            client = %addr.ip(),
            "Unauthorized request"
        );
        return ApiError::forbidden().into_response();
    }

    next.run(request).await
}

/// What a requester is allowed to see on the scoreboard and timeline.
pub struct Viewer {
    pub is_admin: bool,
    pub team_id: Option<i64>,
}

impl Viewer {
    pub async fn resolve(state: &AppState, addr: SocketAddr) -> Viewer {
        let ip = addr.ip();

        if state.access.allowed(ip, Role::Admin) {
            return Viewer {
                is_admin: true,
                team_id: None,
            };
        }

        let team_id = if state.access.allowed(ip, Role::Team) {
            state.teams.get_team_for_ip(ip).await.ok().map(|t| t.id)
        } else {
            None
        };

        Viewer {
            is_admin: false,
            team_id,
        }
    }

    /// Apply the hide-others and hidden-teams rules to a per-team record.
    pub fn sees_team(&self, team_id: i64, hide_others: bool, hidden: &[i64]) -> bool {
        if self.is_admin {
            return true;
        }

        if self.team_id == Some(team_id) {
            return true;
        }

        if hide_others {
            return false;
        }

        !hidden.contains(&team_id)
    }
}
