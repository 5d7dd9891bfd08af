//! Wire types for the REST and websocket APIs.
//!
//! Every resource follows the same layering: the `…Put` struct carries the
//! editable fields, `…Post` the creatable fields, and the bare name the full
//! record as stored.

pub mod event;
pub mod flag;
pub mod score;
pub mod scoreboard;
pub mod status;
pub mod team;
pub mod timeline;

pub use event::{
    Event, EventFlag, EventInternal, EventLogging, EventTimeline, EventType, SubmissionResult,
    TimelineEventType,
};
pub use flag::{AdminFlag, AdminFlagPost, AdminFlagPut, Flag, FlagPost, FlagPut};
pub use score::{AdminScore, AdminScorePost, AdminScorePut};
pub use scoreboard::ScoreboardEntry;
pub use status::{Status, StatusFlags};
pub use team::{AdminTeam, AdminTeamPost, AdminTeamPut, Team, TeamPut};
pub use timeline::{TimelineEntry, TimelineEntryScore};
