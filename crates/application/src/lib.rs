//! Askgod Application Layer
pub mod ports;
pub mod services;

pub use ports::{
    ConfigRepository, EventPublisher, FlagRepository, ScoreRepository, SubmitOutcome,
    TeamRepository,
};
pub use services::{AccessResolver, Role, SharedConfig, SubmissionService};
