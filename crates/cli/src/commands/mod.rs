pub mod admin;
pub mod details;
pub mod history;
pub mod scoreboard;
pub mod status;
pub mod submit;
pub mod timeline;

/// Timestamp format used in tables.
pub const TIME_LAYOUT: &str = "%Y/%m/%d %H:%M";
