use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// URL: /1.0/team
// Access: team

/// The fields a team may edit about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPut {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub website: String,
}

/// A team as seen by its own members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub website: String,
}

// URL: /1.0/teams
// Access: admin

/// The admin-editable fields of a team record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminTeamPut {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub notes: String,

    /// Comma-separated list of CIDR subnets owned by the team.
    #[serde(default)]
    pub subnets: String,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

pub type AdminTeamPost = AdminTeamPut;

/// A full team record as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminTeam {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub website: String,
    pub notes: String,
    pub subnets: String,
    pub tags: BTreeMap<String, String>,
}

impl AdminTeam {
    /// The member-visible subset of the record.
    pub fn member_view(&self) -> Team {
        Team {
            id: self.id,
            name: self.name.clone(),
            country: self.country.clone(),
            website: self.website.clone(),
        }
    }

    pub fn team_put(&self) -> TeamPut {
        TeamPut {
            name: self.name.clone(),
            country: self.country.clone(),
            website: self.website.clone(),
        }
    }

    /// Teams must have both a name and a country before they show up on the
    /// scoreboard or may submit flags.
    pub fn is_registered(&self) -> bool {
        !self.name.is_empty() && !self.country.is_empty()
    }
}
