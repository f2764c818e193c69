use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the payload for a user login request.
///
/// Both fields are forwarded verbatim to the identity provider; only emptiness is checked.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Represents the payload for a new account signup request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    /// Optional display name, stored alongside the record.
    #[serde(default)]
    pub username: Option<String>,
}

/// A row of the `users` table.
///
/// At most one record exists per email; the table carries a unique constraint on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for the `users` table.
///
/// Leaving `id` unset lets the store assign one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NewUserRecord {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Materializes the record the way a store would, assigning an id when none was given.
    pub fn into_record(self) -> UserRecord {
        UserRecord {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            email: self.email,
            username: self.username,
            password: self.password,
            created_at: Some(Utc::now()),
        }
    }
}
