use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetsConfig {
    /// CIDR subnets granted admin access.
    #[serde(default)]
    pub admins: Vec<String>,

    /// CIDR subnets granted team access.
    #[serde(default)]
    pub teams: Vec<String>,

    /// CIDR subnets granted guest access.
    #[serde(default)]
    pub guests: Vec<String>,
}
