use askgod_application::ports::FlagRepository;
use askgod_domain::{tags, AdminFlag, AdminFlagPost, AdminFlagPut, StoreError};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::map_db_error;

type FlagRow = (i64, String, i64, String, String, String);

pub struct PgFlagRepository {
    pool: PgPool,
}

impl PgFlagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_flag(row: FlagRow) -> Result<AdminFlag, StoreError> {
        let (id, flag, value, return_string, description, packed) = row;

        Ok(AdminFlag {
            id,
            flag,
            value,
            return_string,
            description,
            tags: tags::parse(&packed)?,
        })
    }
}

#[async_trait]
impl FlagRepository for PgFlagRepository {
    #[instrument(skip(self))]
    async fn get_flags(&self) -> Result<Vec<AdminFlag>, StoreError> {
        let rows = sqlx::query_as::<_, FlagRow>(
            "SELECT id, flag, value, COALESCE(return_string, ''),
                    COALESCE(description, ''), COALESCE(tags, '')
             FROM flag ORDER BY id ASC;",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Self::row_to_flag).collect()
    }

    #[instrument(skip(self))]
    async fn get_flag(&self, id: i64) -> Result<AdminFlag, StoreError> {
        let row = sqlx::query_as::<_, FlagRow>(
            "SELECT id, flag, value, COALESCE(return_string, ''),
                    COALESCE(description, ''), COALESCE(tags, '')
             FROM flag WHERE id=$1;",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::row_to_flag(row)
    }

    #[instrument(skip(self, flag))]
    async fn create_flag(&self, flag: &AdminFlagPost) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO flag (flag, value, return_string, description, tags)
             VALUES ($1, $2, $3, $4, $5) RETURNING id;",
        )
        .bind(&flag.flag)
        .bind(flag.value)
        .bind(&flag.return_string)
        .bind(&flag.description)
        .bind(tags::pack(&flag.tags))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.0)
    }

    #[instrument(skip(self, flag))]
    async fn update_flag(&self, id: i64, flag: &AdminFlagPut) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE flag SET flag=$1, value=$2, return_string=$3, description=$4, tags=$5
             WHERE id=$6;",
        )
        .bind(&flag.flag)
        .bind(flag.value)
        .bind(&flag.return_string)
        .bind(&flag.description)
        .bind(tags::pack(&flag.tags))
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
    async fn delete_flag(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM flag WHERE id=$1;")
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
    async fn clear_flags(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM flag;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("ALTER SEQUENCE flag_id_seq RESTART;")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)
    }
}
