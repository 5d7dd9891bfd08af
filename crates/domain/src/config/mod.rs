//! Configuration structures.
//!
//! The configuration splits in two: the `daemon` and `database` sections are
//! read from the YAML file at startup and never change at runtime, while the
//! `scoring`, `teams` and `subnets` sections are editable through the admin
//! API and persisted in the database, which becomes authoritative for them
//! after first boot.

pub mod daemon;
pub mod database;
pub mod root;
pub mod scoring;
pub mod subnets;
pub mod teams;

pub use daemon::DaemonConfig;
pub use database::DatabaseConfig;
pub use root::{Config, ConfigPut};
pub use scoring::ScoringConfig;
pub use subnets::SubnetsConfig;
pub use teams::TeamsConfig;
