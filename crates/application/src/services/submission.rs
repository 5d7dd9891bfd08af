use std::net::IpAddr;
use std::sync::Arc;

use askgod_domain::{
    validators, AdminScore, AdminScorePost, AdminScorePut, EventFlag, EventTimeline, Flag,
    FlagPost, StoreError, SubmissionResult, TimelineEntryScore, TimelineEventType,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use super::SharedConfig;
use crate::ports::{
    EventPublisher, FlagRepository, ScoreRepository, SubmitOutcome, TeamRepository,
};

/// The submission and scoring engine.
///
/// Validates flag submissions, records score rows and emits the `flags` and
/// `timeline` events that keep clients and peers in sync. Admin-driven score
/// changes go through here too so that every mutation of a team's total
/// produces a consistent event trail.
pub struct SubmissionService {
    config: SharedConfig,
    teams: Arc<dyn TeamRepository>,
    flags: Arc<dyn FlagRepository>,
    scores: Arc<dyn ScoreRepository>,
    events: Arc<dyn EventPublisher>,
}

impl SubmissionService {
    pub fn new(
        config: SharedConfig,
        teams: Arc<dyn TeamRepository>,
        flags: Arc<dyn FlagRepository>,
        scores: Arc<dyn ScoreRepository>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            teams,
            flags,
            scores,
            events,
        }
    }

    /// Process a flag submission from `client_ip`.
    ///
    /// Both events for a successful submission (`flags` then `timeline`) are
    /// published from this task, in that order.
    #[instrument(skip(self, flag))]
    pub async fn submit(&self, client_ip: IpAddr, flag: FlagPost) -> Result<Flag, StoreError> {
        if self.config.load().editable.scoring.read_only {
            return Err(StoreError::Forbidden(
                "Flag submission isn't allowed at this time".to_string(),
            ));
        }

        validators::validate_notes(&flag.notes)?;

        let team = self.teams.get_team_for_ip(client_ip).await?;

        if !team.is_registered() {
            warn!(teamid = team.id, "Unconfigured team tried to submit flag");
            return Err(StoreError::Conflict(
                "Team name and country are required to participate".to_string(),
            ));
        }

        match self.scores.submit_team_flag(team.id, &flag).await? {
            SubmitOutcome::UnknownFlag => {
                self.count_submission(team.id, SubmissionResult::Invalid);
                self.events
                    .publish_flag(EventFlag {
                        team: team.clone(),
                        flag: None,
                        input: flag.flag.clone(),
                        value: 0,
                        result: SubmissionResult::Invalid,
                    })
                    .await;

                info!(teamid = team.id, flag = %flag.flag, "Invalid flag submitted");
                Err(StoreError::Conflict("Invalid flag submitted".to_string()))
            }
            SubmitOutcome::Duplicate { flag: matched } => {
                self.count_submission(team.id, SubmissionResult::Duplicate);
                self.events
                    .publish_flag(EventFlag {
                        team: team.clone(),
                        flag: Some(matched),
                        input: flag.flag.clone(),
                        value: 0,
                        result: SubmissionResult::Duplicate,
                    })
                    .await;

                info!(teamid = team.id, flag = %flag.flag, "The flag was already submitted");
                Err(StoreError::AlreadySubmitted)
            }
            SubmitOutcome::Accepted { record, flag: matched } => {
                self.count_submission(team.id, SubmissionResult::Valid);
                self.events
                    .publish_flag(EventFlag {
                        team: team.clone(),
                        flag: Some(matched),
                        input: flag.flag.clone(),
                        value: record.value,
                        result: SubmissionResult::Valid,
                    })
                    .await;

                let total = self.scores.get_team_points(team.id).await?;
                self.events
                    .publish_timeline(EventTimeline {
                        teamid: team.id,
                        team: Some(team.team_put()),
                        score: Some(TimelineEntryScore {
                            submit_time: Utc::now(),
                            value: record.value,
                            total,
                        }),
                        change: TimelineEventType::ScoreUpdated,
                    })
                    .await;

                info!(
                    teamid = team.id,
                    flagid = record.id,
                    value = record.value,
                    "Correct flag submitted"
                );
                Ok(record)
            }
        }
    }

    /// Record a score row by admin fiat, bypassing flag matching.
    #[instrument(skip(self, score))]
    pub async fn admin_create_score(
        &self,
        score: AdminScorePost,
    ) -> Result<AdminScore, StoreError> {
        let total_before = self.scores.get_team_points(score.team_id).await?;
        let created = self.scores.create_score(&score).await?;

        let team = self.teams.get_team(score.team_id).await?;
        let flag = self.flags.get_flag(score.flag_id).await?;

        self.count_submission(team.id, SubmissionResult::Valid);
        self.events
            .publish_flag(EventFlag {
                team: team.clone(),
                flag: Some(flag.clone()),
                input: flag.flag.clone(),
                value: created.value,
                result: SubmissionResult::Valid,
            })
            .await;

        let total = self.scores.get_team_points(team.id).await?;
        self.publish_score_update(team.id, total - total_before, total)
            .await;

        info!(
            id = created.id,
            teamid = score.team_id,
            flagid = score.flag_id,
            value = score.value,
            "New score entry defined"
        );
        Ok(created)
    }

    /// Record a batch of score rows atomically. Events are emitted only
    /// once the whole batch is committed.
    #[instrument(skip(self, scores))]
    pub async fn admin_create_scores(
        &self,
        scores: Vec<AdminScorePost>,
    ) -> Result<Vec<i64>, StoreError> {
        let ids = self.scores.create_scores(&scores).await?;

        for score in &scores {
            let team = self.teams.get_team(score.team_id).await?;
            let flag = self.flags.get_flag(score.flag_id).await?;

            self.count_submission(team.id, SubmissionResult::Valid);
            self.events
                .publish_flag(EventFlag {
                    team: team.clone(),
                    flag: Some(flag.clone()),
                    input: flag.flag.clone(),
                    value: score.value,
                    result: SubmissionResult::Valid,
                })
                .await;

            let total = self.scores.get_team_points(score.team_id).await?;
            self.publish_score_update(score.team_id, score.value, total)
                .await;

            info!(
                teamid = score.team_id,
                flagid = score.flag_id,
                value = score.value,
                "New score entry defined"
            );
        }

        Ok(ids)
    }

    /// Update an existing score row; the timeline event carries the change
    /// to the team's total rather than the new row value.
    #[instrument(skip(self, score))]
    pub async fn admin_update_score(
        &self,
        id: i64,
        score: AdminScorePut,
    ) -> Result<(), StoreError> {
        let existing = self.scores.get_score(id).await?;
        let total_before = self.scores.get_team_points(existing.team_id).await?;

        self.scores.update_score(id, &score).await?;

        let total = self.scores.get_team_points(existing.team_id).await?;
        self.publish_score_update(existing.team_id, total - total_before, total)
            .await;

        info!(id, value = score.value, "Score entry updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn admin_delete_score(&self, id: i64) -> Result<(), StoreError> {
        let deleted = self.scores.delete_score(id).await?;

        let total = self.scores.get_team_points(deleted.team_id).await?;
        self.publish_score_update(deleted.team_id, -deleted.value, total)
            .await;

        info!(id, "Score entry deleted");
        Ok(())
    }

    /// Truncate the score table and tell every dashboard to start over.
    #[instrument(skip(self))]
    pub async fn admin_clear_scores(&self) -> Result<(), StoreError> {
        self.scores.clear_scores().await?;

        self.events
            .publish_timeline(EventTimeline {
                teamid: 0,
                team: None,
                score: None,
                change: TimelineEventType::Reload,
            })
            .await;

        info!("All scores deleted");
        Ok(())
    }

    async fn publish_score_update(&self, team_id: i64, value: i64, total: i64) {
        let team = match self.teams.get_team(team_id).await {
            Ok(team) => Some(team.team_put()),
            Err(_) => None,
        };

        self.events
            .publish_timeline(EventTimeline {
                teamid: team_id,
                team,
                score: Some(TimelineEntryScore {
                    submit_time: Utc::now(),
                    value,
                    total,
                }),
                change: TimelineEventType::ScoreUpdated,
            })
            .await;
    }

    fn count_submission(&self, team_id: i64, result: SubmissionResult) {
        let labels = [
            ("team_id", team_id.to_string()),
            ("type", result.as_str().to_string()),
        ];

        metrics::counter!("askgod_scores_total", &labels).increment(1);
    }
}
