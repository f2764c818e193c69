use async_trait::async_trait;
use std::sync::Arc;

use crate::models::Session;
use crate::provider::{IdentityProvider, ProviderError};

/// Resolves a bearer token to an established session.
///
/// `Ok(None)` means the token does not belong to a live session.
#[async_trait]
pub trait SessionLookup: Send + Sync {
    async fn lookup(&self, access_token: &str) -> Result<Option<Session>, ProviderError>;
}

/// Asks the identity provider who owns the token.
pub struct ProviderSessionLookup {
    identity: Arc<dyn IdentityProvider>,
}

impl ProviderSessionLookup {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl SessionLookup for ProviderSessionLookup {
    async fn lookup(&self, access_token: &str) -> Result<Option<Session>, ProviderError> {
        let user = self.identity.get_user(access_token).await?;
        Ok(user.map(|user| Session {
            access_token: access_token.to_string(),
            user,
        }))
    }
}
