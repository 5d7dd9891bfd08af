use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Display name of the competition.
    #[serde(default)]
    pub event_name: String,

    /// Restrict scoreboard and timeline events to the requesting team.
    #[serde(default)]
    pub hide_others: bool,

    /// Disable new flag submissions while leaving reads available.
    #[serde(default)]
    pub read_only: bool,

    /// Flag tag keys exposed to non-admin clients.
    #[serde(default)]
    pub public_tags: Vec<String>,
}
