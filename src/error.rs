//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can hit, whether the identity provider rejected the caller,
//! the record store failed, or the request itself was malformed, ends up as one of its
//! variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly; the response body is always `{"error": "<message>"}`.
//! `From` conversions exist for `ProviderError`, `StoreError` and
//! `validator::ValidationErrors`, allowing for easy conversion using the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::provider::ProviderError;
use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a specific type of error, carrying the message
/// that is sent back to the client.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is required but missing or rejected (HTTP 401).
    Unauthorized(String),
    /// The request was malformed or the identity provider refused it (HTTP 400).
    BadRequest(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the record store (HTTP 500).
    DatabaseError(String),
    /// Input validation failed (HTTP 422 Unprocessable Entity).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
    /// The route exists but has no behaviour yet (HTTP 501).
    NotImplemented(String),
}

impl AppError {
    /// The fixed payload returned by the session gate.
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized".into())
    }

    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg)
            | AppError::ValidationError(msg)
            | AppError::NotImplemented(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::NotImplemented(msg) => write!(f, "Not Implemented: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// The client only ever sees the bare message; the variant picks the status code.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.message()
        }))
    }
}

/// Provider rejections are passed through to the client verbatim as a 400.
impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> AppError {
        AppError::BadRequest(error.message)
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
