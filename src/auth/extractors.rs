use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::bearer_token;
use crate::error::AppError;
use crate::models::Session;

/// Extracts the session established by `RequireAuth` from request extensions.
///
/// Only meaningful on routes wrapped by `RequireAuth`; elsewhere it yields
/// `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

impl FromRequest for AuthenticatedSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>().cloned() {
            Some(session) => ready(Ok(AuthenticatedSession(session))),
            None => ready(Err(AppError::unauthorized().into())),
        }
    }
}

/// The raw bearer token of the request, without any validation.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequest for BearerToken {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match bearer_token(req.headers()) {
            Some(token) => ready(Ok(BearerToken(token.to_string()))),
            None => ready(Err(AppError::unauthorized().into())),
        }
    }
}
