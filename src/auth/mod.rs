pub mod extractors;
pub mod middleware;
pub mod session;

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

// Re-export necessary items
pub use extractors::{AuthenticatedSession, BearerToken};
pub use middleware::RequireAuth;
pub use session::{ProviderSessionLookup, SessionLookup};

/// Returns the token of an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
