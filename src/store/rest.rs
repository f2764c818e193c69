use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use super::{RecordStore, StoreError, UNIQUE_VIOLATION};
use crate::models::{Board, NewUserRecord, UserBoard, UserRecord};

/// Record store backed by the PostgREST gateway (`{base_url}/rest/v1/{table}`).
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    pub fn with_client(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table(&self, name: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, name)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Record store returned status {}", status));
        debug!("record store returned {}: {}", status, body);
        if body.get("code").and_then(Value::as_str) == Some(UNIQUE_VIOLATION) {
            Err(StoreError::Conflict(message))
        } else {
            Err(StoreError::Backend(message))
        }
    }
}

/// Formats a PostgREST `in.(…)` filter, quoting each member.
pub fn in_filter<T: ToString>(values: &[T]) -> String {
    let members: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.to_string()))
        .collect();
    format!("in.({})", members.join(","))
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<UserRecord>, StoreError> {
        let request = self
            .client
            .get(self.table("users"))
            .query(&[("select", "*".to_string()), ("email", format!("eq.{}", email))]);
        Self::read_rows(self.authorize(request).send().await?).await
    }

    async fn insert_user(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let request = self
            .client
            .post(self.table("users"))
            .header("Prefer", "return=representation")
            .json(&[&user]);
        let rows: Vec<UserRecord> = Self::read_rows(self.authorize(request).send().await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("Insert into users returned no row".into()))
    }

    async fn board_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let request = self.client.get(self.table("user_boards")).query(&[
            ("select", "user_id,board_id".to_string()),
            ("user_id", format!("eq.{}", user_id)),
        ]);
        let rows: Vec<UserBoard> = Self::read_rows(self.authorize(request).send().await?).await?;
        Ok(rows.into_iter().map(|row| row.board_id).collect())
    }

    async fn boards_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Board>, StoreError> {
        let request = self
            .client
            .get(self.table("boards"))
            .query(&[("select", "*".to_string()), ("id", in_filter(ids))]);
        Self::read_rows(self.authorize(request).send().await?).await
    }
}
