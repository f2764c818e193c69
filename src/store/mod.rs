//! The record store seam.
//!
//! Rows live in the hosted Postgres database. `PostgrestStore` reaches it through the
//! REST gateway with the project key; `PgStore` talks to it directly through `sqlx`
//! when a connection string is configured.

pub mod postgres;
pub mod rest;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{Board, NewUserRecord, UserRecord};

pub use postgres::PgStore;
pub use rest::PostgrestStore;

/// Postgres SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The write collided with a unique constraint.
    Conflict(String),
    /// Anything else the store reported, or a transport failure on the way to it.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Conflict(msg) | StoreError::Backend(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Backend(error.to_string())
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All `users` rows whose email equals `email` exactly.
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<UserRecord>, StoreError>;

    async fn insert_user(&self, user: NewUserRecord) -> Result<UserRecord, StoreError>;

    /// The `board_id` column of every `user_boards` row for `user_id`.
    async fn board_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    async fn boards_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Board>, StoreError>;
}

/// Resolves a user's board memberships, then fetches the matching boards.
pub async fn boards_for_user(
    store: &dyn RecordStore,
    user_id: Uuid,
) -> Result<Vec<Board>, StoreError> {
    let board_ids = store.board_ids_for_user(user_id).await?;
    if board_ids.is_empty() {
        return Ok(Vec::new());
    }
    store.boards_by_ids(&board_ids).await
}
