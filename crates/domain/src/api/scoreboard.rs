use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::team::Team;

// URL: /1.0/scoreboard
// Access: guest

/// One line on the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub team: Team,
    pub value: i64,
    pub last_submit_time: DateTime<Utc>,
}
