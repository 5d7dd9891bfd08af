pub mod config_repository;
pub mod events;
pub mod flag_repository;
pub mod score_repository;
pub mod team_repository;

pub use config_repository::ConfigRepository;
pub use events::EventPublisher;
pub use flag_repository::FlagRepository;
pub use score_repository::{ScoreRepository, SubmitOutcome};
pub use team_repository::TeamRepository;
