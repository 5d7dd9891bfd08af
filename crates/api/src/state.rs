use std::sync::Arc;

use askgod_application::ports::{FlagRepository, ScoreRepository, TeamRepository};
use askgod_application::{AccessResolver, SharedConfig, SubmissionService};
use askgod_infrastructure::{ConfigManager, EventBus};

#[derive(Clone)]
pub struct AppState {
    pub config: SharedConfig,
    pub config_manager: Arc<ConfigManager>,
    pub access: Arc<AccessResolver>,
    pub bus: Arc<EventBus>,
    pub teams: Arc<dyn TeamRepository>,
    pub flags: Arc<dyn FlagRepository>,
    pub scores: Arc<dyn ScoreRepository>,
    pub submission: Arc<SubmissionService>,
}
