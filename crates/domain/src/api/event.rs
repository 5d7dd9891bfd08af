use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flag::AdminFlag;
use super::team::{AdminTeam, TeamPut};
use super::timeline::TimelineEntryScore;

// URL: /1.0/events
// Access: varies by type

/// The typed channels carried by the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Timeline,
    Logging,
    Flags,
    Cluster,
    Internal,
}

impl EventType {
    /// The types a regular listener may subscribe to.
    pub const SUBSCRIBABLE: &'static [EventType] =
        &[EventType::Timeline, EventType::Logging, EventType::Flags];

    /// The types mirrored to cluster peers.
    pub const PEER: &'static [EventType] = &[
        EventType::Timeline,
        EventType::Logging,
        EventType::Flags,
        EventType::Internal,
    ];

    /// True for the types only admins may subscribe to.
    pub fn admin_only(&self) -> bool {
        matches!(self, EventType::Logging | EventType::Flags)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Timeline => "timeline",
            EventType::Logging => "logging",
            EventType::Flags => "flags",
            EventType::Cluster => "cluster",
            EventType::Internal => "internal",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timeline" => Ok(EventType::Timeline),
            "logging" => Ok(EventType::Logging),
            "flags" => Ok(EventType::Flags),
            "cluster" => Ok(EventType::Cluster),
            "internal" => Ok(EventType::Internal),
            other => Err(format!("Invalid event type: {}", other)),
        }
    }
}

/// The envelope around every event on the websocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub server: String,

    #[serde(rename = "type")]
    pub event_type: EventType,

    pub timestamp: DateTime<Utc>,

    pub metadata: serde_json::Value,
}

/// Metadata of a `logging` event (admin only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLogging {
    pub message: String,
    pub level: String,
    pub context: BTreeMap<String, String>,
}

/// The outcome of a flag submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionResult {
    Valid,
    Duplicate,
    Invalid,
}

impl SubmissionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionResult::Valid => "valid",
            SubmissionResult::Duplicate => "duplicate",
            SubmissionResult::Invalid => "invalid",
        }
    }
}

/// Metadata of a `flags` event (admin only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFlag {
    pub team: AdminTeam,
    pub flag: Option<AdminFlag>,

    pub input: String,
    pub value: i64,

    #[serde(rename = "type")]
    pub result: SubmissionResult,
}

/// The kinds of timeline changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineEventType {
    TeamAdded,
    TeamUpdated,
    TeamRemoved,
    ScoreUpdated,
    Reload,
}

/// Metadata of a `timeline` event (guest visible).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTimeline {
    pub teamid: i64,
    pub team: Option<TeamPut>,
    pub score: Option<TimelineEntryScore>,

    #[serde(rename = "type")]
    pub change: TimelineEventType,
}

/// Metadata of an `internal` synchronisation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInternal {
    #[serde(rename = "type")]
    pub kind: String,
}

impl EventInternal {
    pub const CONFIG_UPDATED: &'static str = "config-updated";

    pub fn config_updated() -> Self {
        Self {
            kind: Self::CONFIG_UPDATED.to_string(),
        }
    }
}
