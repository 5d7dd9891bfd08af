use serde::{Deserialize, Serialize};

// URL: /1.0
// Access: guest

/// Server status as seen by the requesting client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub is_admin: bool,
    pub is_team: bool,
    pub is_guest: bool,

    pub event_name: String,

    pub flags: StatusFlags,
}

/// Configuration flags that clients care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub team_self_register: bool,
    pub team_self_update: bool,

    pub board_read_only: bool,
    pub board_hide_others: bool,
}
