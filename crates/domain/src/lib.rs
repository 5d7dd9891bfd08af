//! Askgod Domain Layer
pub mod api;
pub mod config;
pub mod errors;
pub mod tags;
pub mod validators;

pub use api::{
    AdminFlag, AdminFlagPost, AdminFlagPut, AdminScore, AdminScorePost, AdminScorePut, AdminTeam,
    AdminTeamPost, AdminTeamPut, Event, EventFlag, EventInternal, EventLogging, EventTimeline,
    EventType, Flag, FlagPost, FlagPut, ScoreboardEntry, Status, StatusFlags, SubmissionResult,
    Team, TeamPut, TimelineEntry, TimelineEntryScore, TimelineEventType,
};
pub use config::{Config, ConfigPut};
pub use errors::StoreError;
