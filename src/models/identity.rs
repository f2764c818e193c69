use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The identity provider's user object.
///
/// Only `id` is interpreted; every other field the provider sends is kept in `extra`
/// and handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentityUser {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            extra: Map::new(),
        }
    }
}

/// Opaque session object issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentitySession(pub Value);

/// An established session, attached to the request by the auth gate.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: IdentityUser,
}
