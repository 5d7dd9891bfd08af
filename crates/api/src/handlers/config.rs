use askgod_domain::{Config, ConfigPut, EventInternal, EventType};
use axum::extract::State;
use axum::Json;
use tracing::{error, info};

use crate::response::ApiError;
use crate::state::AppState;

/// The full configuration with secrets masked.
pub async fn get_config(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.load().masked())
}

/// Replace the editable configuration. The change is persisted, applied
/// locally and announced to the cluster so peers reload too.
pub async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<ConfigPut>,
) -> Result<(), ApiError> {
    let current = state
        .config_manager
        .update_editable(config)
        .await
        .map_err(|err| {
            error!(error = %err, "Failed to update the configuration");
            ApiError::from(err)
        })?;

    state.bus.set_hidden_teams(current.hidden_team_ids());

    state
        .bus
        .publish(EventType::Internal, &EventInternal::config_updated());

    info!("Configuration updated");
    Ok(())
}
