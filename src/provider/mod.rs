//! The identity provider seam.
//!
//! Credential verification, account creation and session issuance all happen in the
//! hosted identity service. `IdentityProvider` is the narrow surface the rest of the
//! crate depends on; `GoTrueClient` speaks the hosted service's REST API.

pub mod gotrue;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::models::{IdentitySession, IdentityUser};

pub use gotrue::GoTrueClient;

/// A failure reported by (or while talking to) the identity provider.
///
/// `message` is what the provider said and is what the client eventually sees.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Builds an error from a provider error body.
    ///
    /// The hosted service has used several shapes over time, so the first of
    /// `msg`, `error_description`, `message` and `error` that is a string wins.
    pub fn from_body(status: u16, body: &Value) -> Self {
        let message = ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Identity provider returned status {}", status));
        Self::new(Some(status), message)
    }

    /// True when the provider refused the bearer token itself.
    pub fn is_rejected_token(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.status().map(|s| s.as_u16()), error.to_string())
    }
}

/// Result of a successful password sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: IdentityUser,
    pub session: IdentitySession,
}

/// Result of a successful signup.
///
/// `session` is `None` when the provider requires the address to be confirmed first.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user: IdentityUser,
    pub session: Option<IdentitySession>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignIn, ProviderError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, ProviderError>;

    /// Revokes the session behind `access_token`. Without a token there is nothing to revoke.
    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError>;

    /// Resolves the user owning `access_token`; `Ok(None)` when the provider rejects it.
    async fn get_user(&self, access_token: &str) -> Result<Option<IdentityUser>, ProviderError>;
}
