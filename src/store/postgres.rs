use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::{Board, NewUserRecord, UserRecord};

/// Record store talking to Postgres directly.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<UserRecord>, StoreError> {
        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, username, password, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_user(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        // COALESCE keeps the column default when no id was supplied.
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, username, password)
             VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4)
             RETURNING id, email, username, password, created_at",
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.username)
        .bind(user.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn board_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT board_id FROM user_boards WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn boards_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Board>, StoreError> {
        // Rows go through JSON so extra columns reach the client untouched.
        let rows = sqlx::query_scalar::<_, sqlx::types::Json<Board>>(
            "SELECT to_jsonb(b) FROM boards b WHERE b.id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}
