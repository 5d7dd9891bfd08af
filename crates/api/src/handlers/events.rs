use std::collections::HashMap;
use std::net::SocketAddr;

use askgod_application::Role;
use askgod_domain::EventType;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::response::ApiError;
use crate::state::AppState;

/// `GET /1.0/events?type=…`: subscribe to the event stream.
///
/// `type=cluster` is the peer-to-peer inject path; anything else is a
/// comma-separated subscription list for a regular client.
pub async fn get_events(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(type_str) = query.get("type").filter(|t| !t.is_empty()) else {
        warn!(client = %addr.ip(), "Events request without a type");
        return ApiError::bad_request("Missing event type").into_response();
    };

    if type_str == "cluster" {
        return inject_events(state, addr, ws);
    }

    let mut types = Vec::new();
    for entry in type_str.split(',') {
        let event_type: EventType = match entry.parse() {
            Ok(event_type) if EventType::SUBSCRIBABLE.contains(&event_type) => event_type,
            _ => {
                warn!(client = %addr.ip(), kind = %entry, "Invalid event type");
                return ApiError::bad_request("Invalid event type").into_response();
            }
        };

        if event_type.admin_only() && !state.access.allowed(addr.ip(), Role::Admin) {
            warn!(client = %addr.ip(), kind = %entry, "Unauthorized attempt to get events");
            return ApiError::forbidden().into_response();
        }

        types.push(event_type);
    }

    // Admins and peers get -1, teams their id, everyone else 0.
    let team_id = if state.access.allowed(addr.ip(), Role::Admin) {
        -1
    } else {
        match state.teams.get_team_for_ip(addr.ip()).await {
            Ok(team) => team.id,
            Err(_) => 0,
        }
    };

    ws.on_upgrade(move |socket| client_connection(state, socket, team_id, types))
}

/// Forward bus events to the client until either side goes away.
async fn client_connection(state: AppState, socket: WebSocket, team_id: i64, types: Vec<EventType>) {
    let mut handle = state.bus.register(team_id, false, types);
    debug!(uuid = %handle.id, "New events listener");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            outbound = handle.outbound.recv() => {
                match outbound {
                    Some(body) => {
                        if sender.send(Message::Text(body.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.bus.unregister(handle.id);
    debug!(uuid = %handle.id, "Disconnected events listener");
}

/// The serving side of the cluster relay: peers push their local events to
/// us over this socket.
fn inject_events(state: AppState, addr: SocketAddr, ws: WebSocketUpgrade) -> Response {
    if !state.access.allowed(addr.ip(), Role::Peer) {
        warn!(client = %addr.ip(), "Unauthorized attempt to send events");
        return ApiError::forbidden().into_response();
    }

    ws.on_upgrade(move |socket| peer_connection(state, socket))
}

async fn peer_connection(state: AppState, mut socket: WebSocket) {
    while let Some(frame) = socket.recv().await {
        match frame {
            Ok(Message::Text(text)) => {
                askgod_infrastructure::events::relay::handle_peer_event(
                    &state.bus,
                    &state.config_manager,
                    &text,
                )
                .await;
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }
}
