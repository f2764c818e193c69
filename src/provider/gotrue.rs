use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

use super::{IdentityProvider, ProviderError, SignIn, SignUp};
use crate::models::{IdentitySession, IdentityUser};

/// REST client for a GoTrue identity service (`{base_url}/auth/v1/*`).
#[derive(Clone)]
pub struct GoTrueClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoTrueClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
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

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Every call carries the project key; `bearer` overrides it for user-scoped calls.
    fn authorize(&self, request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(bearer.unwrap_or(&self.api_key))
    }

    async fn read_json(response: Response) -> Result<Value, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let error = ProviderError::from_body(status.as_u16(), &body);
        debug!("identity provider returned {}: {}", status, error);
        Err(error)
    }

    fn parse_user(value: Value) -> Result<IdentityUser, ProviderError> {
        serde_json::from_value(value).map_err(|e| {
            warn!("unreadable user object from identity provider: {}", e);
            ProviderError::new(
                None,
                format!("Unexpected user object from identity provider: {}", e),
            )
        })
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignIn, ProviderError> {
        let request = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let body = Self::read_json(self.authorize(request, None).send().await?).await?;

        let user = Self::parse_user(body.get("user").cloned().unwrap_or(Value::Null))?;
        Ok(SignIn {
            user,
            session: IdentitySession(body),
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, ProviderError> {
        let request = self
            .client
            .post(self.endpoint("signup"))
            .json(&json!({ "email": email, "password": password }));
        let body = Self::read_json(self.authorize(request, None).send().await?).await?;

        // With auto-confirm on the service answers with a full session, otherwise
        // with the bare user awaiting confirmation.
        if body.get("access_token").is_some() {
            let user = Self::parse_user(body.get("user").cloned().unwrap_or(Value::Null))?;
            Ok(SignUp {
                user,
                session: Some(IdentitySession(body)),
            })
        } else {
            Ok(SignUp {
                user: Self::parse_user(body)?,
                session: None,
            })
        }
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError> {
        let Some(token) = access_token else {
            return Ok(());
        };
        let request = self.client.post(self.endpoint("logout"));
        let response = self.authorize(request, Some(token)).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(ProviderError::from_body(status.as_u16(), &body))
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<IdentityUser>, ProviderError> {
        let request = self.client.get(self.endpoint("user"));
        let response = self.authorize(request, Some(access_token)).send().await?;
        match Self::read_json(response).await {
            Ok(body) => Self::parse_user(body).map(Some),
            Err(e) if e.is_rejected_token() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
