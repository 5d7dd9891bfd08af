//! In-memory store backing the router tests.

use std::net::IpAddr;
use std::sync::Mutex;

use askgod_application::ports::{
    ConfigRepository, FlagRepository, ScoreRepository, SubmitOutcome, TeamRepository,
};
use askgod_domain::{
    AdminFlag, AdminFlagPost, AdminFlagPut, AdminScore, AdminScorePost, AdminScorePut, AdminTeam,
    AdminTeamPost, AdminTeamPut, ConfigPut, Flag, FlagPost, FlagPut, ScoreboardEntry, StoreError,
    TimelineEntry, TimelineEntryScore,
};
use async_trait::async_trait;
use chrono::Utc;
use ipnetwork::IpNetwork;

#[derive(Default)]
pub struct MockStore {
    pub teams: Mutex<Vec<AdminTeam>>,
    pub flags: Mutex<Vec<AdminFlag>>,
    pub scores: Mutex<Vec<AdminScore>>,
    pub config: Mutex<Option<ConfigPut>>,
}

impl MockStore {
    pub fn with_team(self, team: AdminTeam) -> Self {
        self.teams.lock().unwrap().push(team);
        self
    }

    pub fn with_flag(self, flag: AdminFlag) -> Self {
        self.flags.lock().unwrap().push(flag);
        self
    }
}

#[async_trait]
impl ConfigRepository for MockStore {
    async fn get_config(&self) -> Result<ConfigPut, StoreError> {
        self.config
            .lock()
            .unwrap()
            .clone()
            .ok_or(StoreError::EmptyConfig)
    }

    async fn update_config(&self, config: &ConfigPut) -> Result<(), StoreError> {
        *self.config.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for MockStore {
    async fn get_teams(&self) -> Result<Vec<AdminTeam>, StoreError> {
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn get_team(&self, id: i64) -> Result<AdminTeam, StoreError> {
        self.teams
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_team_for_ip(&self, ip: IpAddr) -> Result<AdminTeam, StoreError> {
        let teams = self.teams.lock().unwrap();
        let mut found: Option<AdminTeam> = None;

        for team in teams.iter() {
            for subnet in team.subnets.split(',') {
                let network: IpNetwork = match subnet.trim().parse() {
                    Ok(network) => network,
                    Err(_) => continue,
                };

                if network.contains(ip) {
                    if found.is_some() {
                        return Err(StoreError::AmbiguousTeam);
                    }
                    found = Some(team.clone());
                }
            }
        }

        found.ok_or(StoreError::NotFound)
    }

    async fn create_team(&self, team: &AdminTeamPost) -> Result<i64, StoreError> {
        let mut teams = self.teams.lock().unwrap();
        let id = teams.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        teams.push(AdminTeam {
            id,
            name: team.name.clone(),
            country: team.country.clone(),
            website: team.website.clone(),
            notes: team.notes.clone(),
            subnets: team.subnets.clone(),
            tags: team.tags.clone(),
        });
        Ok(id)
    }

    async fn update_team(&self, id: i64, team: &AdminTeamPut) -> Result<(), StoreError> {
        let mut teams = self.teams.lock().unwrap();
        let entry = teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;

        entry.name = team.name.clone();
        entry.country = team.country.clone();
        entry.website = team.website.clone();
        entry.notes = team.notes.clone();
        entry.subnets = team.subnets.clone();
        entry.tags = team.tags.clone();
        Ok(())
    }

    async fn delete_team(&self, id: i64) -> Result<(), StoreError> {
        let mut teams = self.teams.lock().unwrap();
        let before = teams.len();
        teams.retain(|t| t.id != id);
        if teams.len() == before {
            return Err(StoreError::NotFound);
        }

        self.scores.lock().unwrap().retain(|s| s.team_id != id);
        Ok(())
    }

    async fn clear_teams(&self) -> Result<(), StoreError> {
        self.teams.lock().unwrap().clear();
        self.scores.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl FlagRepository for MockStore {
    async fn get_flags(&self) -> Result<Vec<AdminFlag>, StoreError> {
        Ok(self.flags.lock().unwrap().clone())
    }

    async fn get_flag(&self, id: i64) -> Result<AdminFlag, StoreError> {
        self.flags
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_flag(&self, flag: &AdminFlagPost) -> Result<i64, StoreError> {
        let mut flags = self.flags.lock().unwrap();

        if flags.iter().any(|f| f.flag.eq_ignore_ascii_case(&flag.flag)) {
            return Err(StoreError::Conflict("Flag already exists".to_string()));
        }

        let id = flags.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        flags.push(AdminFlag {
            id,
            flag: flag.flag.clone(),
            value: flag.value,
            return_string: flag.return_string.clone(),
            description: flag.description.clone(),
            tags: flag.tags.clone(),
        });
        Ok(id)
    }

    async fn update_flag(&self, id: i64, flag: &AdminFlagPut) -> Result<(), StoreError> {
        let mut flags = self.flags.lock().unwrap();
        let entry = flags
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::NotFound)?;

        entry.flag = flag.flag.clone();
        entry.value = flag.value;
        entry.return_string = flag.return_string.clone();
        entry.description = flag.description.clone();
        entry.tags = flag.tags.clone();
        Ok(())
    }

    async fn delete_flag(&self, id: i64) -> Result<(), StoreError> {
        let mut flags = self.flags.lock().unwrap();
        let before = flags.len();
        flags.retain(|f| f.id != id);
        if flags.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn clear_flags(&self) -> Result<(), StoreError> {
        self.flags.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl ScoreRepository for MockStore {
    async fn get_scores(&self) -> Result<Vec<AdminScore>, StoreError> {
        Ok(self.scores.lock().unwrap().clone())
    }

    async fn get_score(&self, id: i64) -> Result<AdminScore, StoreError> {
        self.scores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_score(&self, score: &AdminScorePost) -> Result<AdminScore, StoreError> {
        let mut scores = self.scores.lock().unwrap();

        if scores
            .iter()
            .any(|s| s.team_id == score.team_id && s.flag_id == score.flag_id)
        {
            return Err(StoreError::Conflict("Duplicate score entry".to_string()));
        }

        let id = scores.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let record = AdminScore {
            id,
            team_id: score.team_id,
            flag_id: score.flag_id,
            value: score.value,
            notes: score.notes.clone(),
            submit_time: Utc::now(),
        };
        scores.push(record.clone());
        Ok(record)
    }

    async fn create_scores(&self, posts: &[AdminScorePost]) -> Result<Vec<i64>, StoreError> {
        let mut ids = Vec::new();
        for post in posts {
            ids.push(self.create_score(post).await?.id);
        }
        Ok(ids)
    }

    async fn update_score(&self, id: i64, score: &AdminScorePut) -> Result<(), StoreError> {
        let mut scores = self.scores.lock().unwrap();
        let entry = scores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;

        entry.value = score.value;
        entry.notes = score.notes.clone();
        Ok(())
    }

    async fn delete_score(&self, id: i64) -> Result<AdminScore, StoreError> {
        let mut scores = self.scores.lock().unwrap();
        let index = scores
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;

        Ok(scores.remove(index))
    }

    async fn clear_scores(&self) -> Result<(), StoreError> {
        self.scores.lock().unwrap().clear();
        Ok(())
    }

    async fn get_team_points(&self, team_id: i64) -> Result<i64, StoreError> {
        Ok(self
            .scores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.team_id == team_id)
            .map(|s| s.value)
            .sum())
    }

    async fn get_team_flags(&self, team_id: i64) -> Result<Vec<Flag>, StoreError> {
        let flags = self.flags.lock().unwrap();
        let mut rows: Vec<_> = self
            .scores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.team_id == team_id)
            .map(|s| {
                let flag = flags.iter().find(|f| f.id == s.flag_id);
                Flag {
                    id: s.flag_id,
                    flag: flag.map(|f| f.flag.clone()).unwrap_or_default(),
                    value: s.value,
                    notes: s.notes.clone(),
                    submit_time: s.submit_time,
                    return_string: flag.map(|f| f.return_string.clone()).unwrap_or_default(),
                }
            })
            .collect();

        rows.sort_by_key(|r| r.submit_time);
        Ok(rows)
    }

    async fn get_team_flag(&self, team_id: i64, flag_id: i64) -> Result<Flag, StoreError> {
        self.get_team_flags(team_id)
            .await?
            .into_iter()
            .find(|f| f.id == flag_id)
            .ok_or(StoreError::NotFound)
    }

    async fn update_team_flag(
        &self,
        team_id: i64,
        flag_id: i64,
        flag: &FlagPut,
    ) -> Result<(), StoreError> {
        let mut scores = self.scores.lock().unwrap();
        let entry = scores
            .iter_mut()
            .find(|s| s.team_id == team_id && s.flag_id == flag_id)
            .ok_or(StoreError::NotFound)?;

        entry.notes = flag.notes.clone();
        Ok(())
    }

    async fn submit_team_flag(
        &self,
        team_id: i64,
        flag: &FlagPost,
    ) -> Result<SubmitOutcome, StoreError> {
        let matched = {
            let flags = self.flags.lock().unwrap();
            flags
                .iter()
                .find(|f| f.flag.eq_ignore_ascii_case(&flag.flag))
                .cloned()
        };

        let Some(matched) = matched else {
            return Ok(SubmitOutcome::UnknownFlag);
        };

        {
            let scores = self.scores.lock().unwrap();
            if scores
                .iter()
                .any(|s| s.team_id == team_id && s.flag_id == matched.id)
            {
                return Ok(SubmitOutcome::Duplicate { flag: matched });
            }
        }

        let record = self
            .create_score(&AdminScorePost {
                team_id,
                flag_id: matched.id,
                value: matched.value,
                notes: flag.notes.clone(),
            })
            .await?;

        Ok(SubmitOutcome::Accepted {
            record: Flag {
                id: matched.id,
                flag: matched.flag.clone(),
                value: record.value,
                notes: record.notes,
                submit_time: record.submit_time,
                return_string: matched.return_string.clone(),
            },
            flag: matched,
        })
    }

    async fn get_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, StoreError> {
        let teams = self.teams.lock().unwrap();
        let scores = self.scores.lock().unwrap();

        let mut entries: Vec<ScoreboardEntry> = teams
            .iter()
            .filter(|t| t.is_registered())
            .filter_map(|team| {
                let rows: Vec<_> = scores.iter().filter(|s| s.team_id == team.id).collect();
                let last = rows.iter().map(|s| s.submit_time).max()?;

                Some(ScoreboardEntry {
                    team: team.member_view(),
                    value: rows.iter().map(|s| s.value).sum(),
                    last_submit_time: last,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.value
                .cmp(&a.value)
                .then(a.last_submit_time.cmp(&b.last_submit_time))
        });
        Ok(entries)
    }

    async fn get_timeline(&self) -> Result<Vec<TimelineEntry>, StoreError> {
        let teams = self.teams.lock().unwrap().clone();

        let mut entries = Vec::new();
        for team in teams.iter() {
            let rows = self.get_team_flags(team.id).await?;
            if rows.is_empty() {
                continue;
            }

            let mut total = 0;
            let score = rows
                .into_iter()
                .map(|row| {
                    total += row.value;
                    TimelineEntryScore {
                        submit_time: row.submit_time,
                        value: row.value,
                        total,
                    }
                })
                .collect();

            entries.push(TimelineEntry {
                team: team.member_view(),
                score,
            });
        }

        Ok(entries)
    }
}
