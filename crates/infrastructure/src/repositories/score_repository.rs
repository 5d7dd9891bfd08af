use askgod_application::ports::{ScoreRepository, SubmitOutcome};
use askgod_domain::{
    tags, AdminFlag, AdminScore, AdminScorePost, AdminScorePut, Flag, FlagPost, FlagPut,
    ScoreboardEntry, StoreError, Team, TimelineEntry, TimelineEntryScore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use super::map_db_error;

type ScoreRow = (i64, i64, i64, i64, String, DateTime<Utc>);
type TeamFlagRow = (i64, String, i64, String, DateTime<Utc>, String);
type StandingRow = (i64, String, String, String, i64, DateTime<Utc>);

pub struct PgScoreRepository {
    pool: PgPool,
}

impl PgScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_score(row: ScoreRow) -> AdminScore {
        let (id, team_id, flag_id, value, notes, submit_time) = row;

        AdminScore {
            id,
            team_id,
            flag_id,
            value,
            notes,
            submit_time,
        }
    }

    fn row_to_team_flag(row: TeamFlagRow) -> Flag {
        let (id, flag, value, notes, submit_time, return_string) = row;

        Flag {
            id,
            flag,
            value,
            notes,
            submit_time,
            return_string,
        }
    }
}

#[async_trait]
impl ScoreRepository for PgScoreRepository {
    #[instrument(skip(self))]
    async fn get_scores(&self) -> Result<Vec<AdminScore>, StoreError> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            "SELECT id, team_id, flag_id, value, COALESCE(notes, ''), submit_time
             FROM score ORDER BY id ASC;",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Self::row_to_score).collect())
    }

    #[instrument(skip(self))]
    async fn get_score(&self, id: i64) -> Result<AdminScore, StoreError> {
        let row = sqlx::query_as::<_, ScoreRow>(
            "SELECT id, team_id, flag_id, value, COALESCE(notes, ''), submit_time
             FROM score WHERE id=$1;",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::row_to_score(row))
    }

    #[instrument(skip(self, score))]
    async fn create_score(&self, score: &AdminScorePost) -> Result<AdminScore, StoreError> {
        let row = sqlx::query_as::<_, ScoreRow>(
            "INSERT INTO score (team_id, flag_id, value, notes, submit_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, team_id, flag_id, value, COALESCE(notes, ''), submit_time;",
        )
        .bind(score.team_id)
        .bind(score.flag_id)
        .bind(score.value)
        .bind(&score.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::row_to_score(row))
    }

    #[instrument(skip(self, scores))]
    async fn create_scores(&self, scores: &[AdminScorePost]) -> Result<Vec<i64>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut ids = Vec::with_capacity(scores.len());

        for (index, score) in scores.iter().enumerate() {
            let row: (i64,) = sqlx::query_as(
                "INSERT INTO score (team_id, flag_id, value, notes, submit_time)
                 VALUES ($1, $2, $3, $4, $5) RETURNING id;",
            )
            .bind(score.team_id)
            .bind(score.flag_id)
            .bind(score.value)
            .bind(&score.notes)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match map_db_error(e) {
                StoreError::Conflict(_) => {
                    StoreError::Conflict(format!("Duplicate score entry at index {}", index))
                }
                other => other,
            })?;

            ids.push(row.0);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(ids)
    }

    #[instrument(skip(self, score))]
    async fn update_score(&self, id: i64, score: &AdminScorePut) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE score SET value=$1, notes=$2 WHERE id=$3;")
            .bind(score.value)
            .bind(&score.notes)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_score(&self, id: i64) -> Result<AdminScore, StoreError> {
        let row = sqlx::query_as::<_, ScoreRow>(
            "DELETE FROM score WHERE id=$1
             RETURNING id, team_id, flag_id, value, COALESCE(notes, ''), submit_time;",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::row_to_score(row))
    }

    #[instrument(skip(self))]
    async fn clear_scores(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM score;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("ALTER SEQUENCE score_id_seq RESTART;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn get_team_points(&self, team_id: i64) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(score.value), 0) AS points FROM score WHERE team_id=$1;",
        )
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.0)
    }

    #[instrument(skip(self))]
    async fn get_team_flags(&self, team_id: i64) -> Result<Vec<Flag>, StoreError> {
        let rows = sqlx::query_as::<_, TeamFlagRow>(
            "SELECT score.flag_id, flag.flag, score.value, COALESCE(score.notes, ''),
                    score.submit_time, COALESCE(flag.return_string, '')
             FROM score LEFT JOIN flag ON flag.id = score.flag_id
             WHERE score.team_id=$1 ORDER BY score.submit_time ASC;",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Self::row_to_team_flag).collect())
    }

    #[instrument(skip(self))]
    async fn get_team_flag(&self, team_id: i64, flag_id: i64) -> Result<Flag, StoreError> {
        let row = sqlx::query_as::<_, TeamFlagRow>(
            "SELECT score.flag_id, flag.flag, score.value, COALESCE(score.notes, ''),
                    score.submit_time, COALESCE(flag.return_string, '')
             FROM score LEFT JOIN flag ON flag.id = score.flag_id
             WHERE score.team_id=$1 AND score.flag_id=$2;",
        )
        .bind(team_id)
        .bind(flag_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::row_to_team_flag(row))
    }

    #[instrument(skip(self, flag))]
    async fn update_team_flag(
        &self,
        team_id: i64,
        flag_id: i64,
        flag: &FlagPut,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE score SET notes=$1 WHERE team_id=$2 AND flag_id=$3;")
            .bind(&flag.notes)
            .bind(team_id)
            .bind(flag_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    #[instrument(skip(self, flag))]
    async fn submit_team_flag(
        &self,
        team_id: i64,
        flag: &FlagPost,
    ) -> Result<SubmitOutcome, StoreError> {
        // Case-insensitive match against the flag table.
        type FlagRow = (i64, String, i64, String, String, String);
        let matched = sqlx::query_as::<_, FlagRow>(
            "SELECT id, flag, value, COALESCE(return_string, ''),
                    COALESCE(description, ''), COALESCE(tags, '')
             FROM flag WHERE lower(flag) = lower($1);",
        )
        .bind(&flag.flag)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some((id, flag_str, value, return_string, description, packed)) = matched else {
            return Ok(SubmitOutcome::UnknownFlag);
        };

        let matched = AdminFlag {
            id,
            flag: flag_str,
            value,
            return_string,
            description,
            tags: tags::parse(&packed)?,
        };

        // Per-team dedup.
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM score WHERE team_id=$1 AND flag_id=$2;")
                .bind(team_id)
                .bind(matched.id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        if existing.is_some() {
            return Ok(SubmitOutcome::Duplicate { flag: matched });
        }

        // The value is frozen here; later flag edits don't touch it.
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO score (team_id, flag_id, value, notes, submit_time)
             VALUES ($1, $2, $3, $4, $5) RETURNING id;",
        )
        .bind(team_id)
        .bind(matched.id)
        .bind(matched.value)
        .bind(&flag.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_db_error(e) {
            // Lost the race against a concurrent submission of the same flag.
            StoreError::Conflict(_) => StoreError::AlreadySubmitted,
            other => other,
        })?;

        let record = sqlx::query_as::<_, TeamFlagRow>(
            "SELECT score.flag_id, flag.flag, score.value, COALESCE(score.notes, ''),
                    score.submit_time, COALESCE(flag.return_string, '')
             FROM score LEFT JOIN flag ON flag.id = score.flag_id WHERE score.id=$1;",
        )
        .bind(row.0)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(SubmitOutcome::Accepted {
            record: Self::row_to_team_flag(record),
            flag: matched,
        })
    }

    #[instrument(skip(self))]
    async fn get_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, StoreError> {
        let rows = sqlx::query_as::<_, StandingRow>(
            "SELECT team.id, team.name, COALESCE(team.country, ''), COALESCE(team.website, ''),
                    SUM(score.value) AS points, MAX(score.submit_time) AS last_submit_time
             FROM score JOIN team ON team.id = score.team_id
             WHERE team.name != '' AND COALESCE(team.country, '') != ''
             GROUP BY team.id
             ORDER BY points DESC, last_submit_time ASC;",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, country, website, value, last_submit_time)| ScoreboardEntry {
                team: Team {
                    id,
                    name,
                    country,
                    website,
                },
                value,
                last_submit_time,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_timeline(&self) -> Result<Vec<TimelineEntry>, StoreError> {
        let rows = sqlx::query_as::<_, StandingRow>(
            "SELECT team.id, team.name, COALESCE(team.country, ''), COALESCE(team.website, ''),
                    score.value, score.submit_time
             FROM score JOIN team ON team.id = score.team_id
             ORDER BY team.id ASC, score.submit_time ASC;",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut entries: Vec<TimelineEntry> = Vec::new();
        let mut total = 0;

        for (id, name, country, website, value, submit_time) in rows {
            if entries.last().map(|e| e.team.id) != Some(id) {
                entries.push(TimelineEntry {
                    team: Team {
                        id,
                        name,
                        country,
                        website,
                    },
                    score: Vec::new(),
                });
                total = 0;
            }

            total += value;
            if let Some(entry) = entries.last_mut() {
                entry.score.push(TimelineEntryScore {
                    submit_time,
                    value,
                    total,
                });
            }
        }

        Ok(entries)
    }
}
