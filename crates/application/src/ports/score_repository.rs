use askgod_domain::{
    AdminFlag, AdminScore, AdminScorePost, AdminScorePut, Flag, FlagPost, FlagPut,
    ScoreboardEntry, StoreError, TimelineEntry,
};
use async_trait::async_trait;

/// Result of validating a submitted flag against the per-team dedup rules.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The flag matched and a score row was recorded.
    Accepted { record: Flag, flag: AdminFlag },

    /// The team already has a score row for this flag.
    Duplicate { flag: AdminFlag },

    /// No flag matches the submitted string.
    UnknownFlag,
}

/// Data access for score rows and the views derived from them.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn get_scores(&self) -> Result<Vec<AdminScore>, StoreError>;

    async fn get_score(&self, id: i64) -> Result<AdminScore, StoreError>;

    async fn create_score(&self, score: &AdminScorePost) -> Result<AdminScore, StoreError>;

    /// Create a batch of score rows in a single transaction. On a uniqueness
    /// conflict nothing is applied and the error names the offending index.
    async fn create_scores(&self, scores: &[AdminScorePost]) -> Result<Vec<i64>, StoreError>;

    async fn update_score(&self, id: i64, score: &AdminScorePut) -> Result<(), StoreError>;

    /// Delete a score row, returning the deleted record.
    async fn delete_score(&self, id: i64) -> Result<AdminScore, StoreError>;

    /// Remove every score row and reset the id sequence.
    async fn clear_scores(&self) -> Result<(), StoreError>;

    /// Current total for the team, zero if it has no score rows.
    async fn get_team_points(&self, team_id: i64) -> Result<i64, StoreError>;

    /// The team's score rows joined with flag metadata, oldest first.
    async fn get_team_flags(&self, team_id: i64) -> Result<Vec<Flag>, StoreError>;

    async fn get_team_flag(&self, team_id: i64, flag_id: i64) -> Result<Flag, StoreError>;

    /// Teams may only edit the notes on their own score rows.
    async fn update_team_flag(
        &self,
        team_id: i64,
        flag_id: i64,
        flag: &FlagPut,
    ) -> Result<(), StoreError>;

    /// Match a submission (case-insensitively) against the flag table and
    /// record a score row unless the team already has one for that flag.
    /// The recorded value is the flag's value at this moment.
    async fn submit_team_flag(
        &self,
        team_id: i64,
        flag: &FlagPost,
    ) -> Result<SubmitOutcome, StoreError>;

    /// Current standings: registered teams only, points descending, earliest
    /// last submission breaking ties.
    async fn get_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, StoreError>;

    /// Per-team score history with running totals, in submission order.
    async fn get_timeline(&self) -> Result<Vec<TimelineEntry>, StoreError>;
}
