use std::net::IpAddr;

use askgod_application::ports::TeamRepository;
use askgod_domain::{tags, AdminTeam, AdminTeamPost, AdminTeamPut, StoreError};
use async_trait::async_trait;
use ipnetwork::IpNetwork;
use sqlx::PgPool;
use tracing::{error, instrument};

use super::map_db_error;

type TeamRow = (i64, String, String, String, String, String, String);

pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_team(row: TeamRow) -> Result<AdminTeam, StoreError> {
        let (id, name, country, website, notes, subnets, packed) = row;

        Ok(AdminTeam {
            id,
            name,
            country,
            website,
            notes,
            subnets,
            tags: tags::parse(&packed)?,
        })
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    #[instrument(skip(self))]
    async fn get_teams(&self) -> Result<Vec<AdminTeam>, StoreError> {
        let rows = sqlx::query_as::<_, TeamRow>(
            "SELECT id, name, COALESCE(country, ''), COALESCE(website, ''),
                    COALESCE(notes, ''), COALESCE(subnets, ''), COALESCE(tags, '')
             FROM team ORDER BY id ASC;",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Self::row_to_team).collect()
    }

    #[instrument(skip(self))]
    async fn get_team(&self, id: i64) -> Result<AdminTeam, StoreError> {
        let row = sqlx::query_as::<_, TeamRow>(
            "SELECT id, name, COALESCE(country, ''), COALESCE(website, ''),
                    COALESCE(notes, ''), COALESCE(subnets, ''), COALESCE(tags, '')
             FROM team WHERE id=$1;",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::row_to_team(row)
    }

    #[instrument(skip(self))]
    async fn get_team_for_ip(&self, ip: IpAddr) -> Result<AdminTeam, StoreError> {
        let teams = self.get_teams().await?;

        let mut found: Option<AdminTeam> = None;

        for team in teams {
            if team.subnets.is_empty() {
                continue;
            }

            for subnet in team.subnets.split(',') {
                let subnet = subnet.trim();

                let network: IpNetwork = match subnet.parse() {
                    Ok(network) => network,
                    Err(err) => {
                        error!(teamid = team.id, subnet = %subnet, error = %err, "Bad subnet");
                        continue;
                    }
                };

                if network.contains(ip) {
                    if found.is_some() {
                        error!(client = %ip, "More than one team for client IP");
                        return Err(StoreError::AmbiguousTeam);
                    }

                    found = Some(team.clone());
                }
            }
        }

        found.ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &AdminTeamPost) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO team (name, country, website, notes, subnets, tags)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id;",
        )
        .bind(&team.name)
        .bind(&team.country)
        .bind(&team.website)
        .bind(&team.notes)
        .bind(&team.subnets)
        .bind(tags::pack(&team.tags))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.0)
    }

    #[instrument(skip(self, team))]
    async fn update_team(&self, id: i64, team: &AdminTeamPut) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE team SET name=$1, country=$2, website=$3, notes=$4, subnets=$5, tags=$6
             WHERE id=$7;",
        )
        .bind(&team.name)
        .bind(&team.country)
        .bind(&team.website)
        .bind(&team.notes)
        .bind(&team.subnets)
        .bind(tags::pack(&team.tags))
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
    async fn delete_team(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM team WHERE id=$1;")
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
    async fn clear_teams(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM team;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("ALTER SEQUENCE team_id_seq RESTART;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)
    }
}
