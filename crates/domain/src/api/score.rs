use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// URL: /1.0/scores
// Access: admin

/// The admin-editable fields of a score entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminScorePut {
    #[serde(default)]
    pub value: i64,

    #[serde(default)]
    pub notes: String,
}

/// The fields allowed when creating a score entry by admin fiat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminScorePost {
    pub team_id: i64,
    pub flag_id: i64,

    #[serde(default)]
    pub value: i64,

    #[serde(default)]
    pub notes: String,
}

/// A full score entry as stored. `value` is frozen at submission time and
/// does not track later edits to the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminScore {
    pub id: i64,
    pub team_id: i64,
    pub flag_id: i64,
    pub value: i64,
    pub notes: String,
    pub submit_time: DateTime<Utc>,
}
