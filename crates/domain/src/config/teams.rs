use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsConfig {
    /// Allow teams to set their own name, country and website.
    #[serde(default)]
    pub self_register: bool,

    /// Allow teams to change fields that were already set.
    #[serde(default)]
    pub self_update: bool,

    /// Team ids (as strings) hidden from other teams and guests.
    #[serde(default)]
    pub hidden: Vec<String>,
}
