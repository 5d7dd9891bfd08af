use std::net::IpAddr;

use askgod_domain::{AdminTeam, AdminTeamPost, AdminTeamPut, StoreError};
use async_trait::async_trait;

/// Data access for team records.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get_teams(&self) -> Result<Vec<AdminTeam>, StoreError>;

    /// Returns `StoreError::NotFound` if no team with this id exists.
    async fn get_team(&self, id: i64) -> Result<AdminTeam, StoreError>;

    /// Resolve a client IP to the team owning a subnet containing it.
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - no team subnet contains the IP
    /// * `StoreError::AmbiguousTeam` - more than one team matches
    async fn get_team_for_ip(&self, ip: IpAddr) -> Result<AdminTeam, StoreError>;

    /// Create a team and return its server-assigned id.
    async fn create_team(&self, team: &AdminTeamPost) -> Result<i64, StoreError>;

    async fn update_team(&self, id: i64, team: &AdminTeamPut) -> Result<(), StoreError>;

    async fn delete_team(&self, id: i64) -> Result<(), StoreError>;

    /// Remove every team and reset the id sequence.
    async fn clear_teams(&self) -> Result<(), StoreError>;
}
