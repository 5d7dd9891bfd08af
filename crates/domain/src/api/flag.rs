use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// URL: /1.0/team/flags
// Access: team

/// The editable fields of a team's score entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPut {
    #[serde(default)]
    pub notes: String,
}

/// A flag submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPost {
    pub flag: String,

    #[serde(default)]
    pub notes: String,
}

/// A score entry as seen by the team that earned it. `id` is the flag id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub id: i64,
    pub flag: String,
    pub value: i64,
    pub notes: String,
    pub submit_time: DateTime<Utc>,
    pub return_string: String,
}

// URL: /1.0/flags
// Access: admin

/// The admin-editable fields of a flag definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminFlagPut {
    pub flag: String,

    #[serde(default)]
    pub value: i64,

    #[serde(default)]
    pub return_string: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

pub type AdminFlagPost = AdminFlagPut;

/// A full flag definition as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminFlag {
    pub id: i64,
    pub flag: String,
    pub value: i64,
    pub return_string: String,
    pub description: String,
    pub tags: BTreeMap<String, String>,
}
