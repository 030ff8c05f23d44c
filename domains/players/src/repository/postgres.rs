//! Postgres-backed player store

use postback_common::RepositoryError;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{StoreResult, UserStore};
use crate::domain::entities::{NewUserRecord, UserRecord};

/// Apply pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_game_id(&self, game_id: &str) -> StoreResult<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT game_id, deposit_amount, referred_by, created_at, updated_at
            FROM players
            WHERE game_id = $1
            "#,
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn create(&self, record: NewUserRecord) -> StoreResult<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO players (game_id, referred_by)
            VALUES ($1, $2)
            RETURNING game_id, deposit_amount, referred_by, created_at, updated_at
            "#,
        )
        .bind(&record.game_id)
        .bind(&record.referred_by)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }

    async fn insert_if_absent(&self, record: NewUserRecord) -> StoreResult<Option<UserRecord>> {
        let created = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO players (game_id, referred_by)
            VALUES ($1, $2)
            ON CONFLICT (game_id) DO NOTHING
            RETURNING game_id, deposit_amount, referred_by, created_at, updated_at
            "#,
        )
        .bind(&record.game_id)
        .bind(&record.referred_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    async fn set_deposit_amount(
        &self,
        game_id: &str,
        amount: Decimal,
    ) -> StoreResult<Option<UserRecord>> {
        let updated = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE players SET
                deposit_amount = $2,
                updated_at = NOW()
            WHERE game_id = $1
            RETURNING game_id, deposit_amount, referred_by, created_at, updated_at
            "#,
        )
        .bind(game_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
