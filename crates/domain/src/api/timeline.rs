use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::team::Team;

// URL: /1.0/timeline
// Access: guest

/// The score history of a single team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub team: Team,
    pub score: Vec<TimelineEntryScore>,
}

/// One score row with the team's running total at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntryScore {
    pub submit_time: DateTime<Utc>,
    pub value: i64,
    pub total: i64,
}
