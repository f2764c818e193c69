//! Task endpoints.
//!
//! All of them sit behind `RequireAuth`. Only creation answers today, with the
//! configured backend URL; update and delete report 501 until task storage exists.

use crate::{auth::AuthenticatedSession, config::Config, error::AppError};
use actix_web::{delete, post, put, web, HttpResponse, Responder};
use log::debug;
use serde_json::json;

/// Creates a new task for the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{message: <backend URL>}`.
/// - `401 Unauthorized`: no established session.
#[post("")]
pub async fn create_task(
    config: web::Data<Config>,
    session: AuthenticatedSession,
) -> impl Responder {
    debug!("task creation requested by user {}", session.0.user.id);
    HttpResponse::Ok().json(json!({ "message": config.supabase_url }))
}

#[put("/{task_id}")]
pub async fn update_task(
    task_id: web::Path<String>,
    session: AuthenticatedSession,
) -> Result<HttpResponse, AppError> {
    debug!(
        "update of task {} requested by user {}",
        task_id, session.0.user.id
    );
    Err(AppError::NotImplemented("Not implemented".into()))
}

#[delete("/{task_id}")]
pub async fn delete_task(
    task_id: web::Path<String>,
    session: AuthenticatedSession,
) -> Result<HttpResponse, AppError> {
    debug!(
        "deletion of task {} requested by user {}",
        task_id, session.0.user.id
    );
    Err(AppError::NotImplemented("Not implemented".into()))
}
