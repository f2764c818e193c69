use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: chrono::DateTime<Utc>,
}

/// Liveness check.
///
/// Answers without touching the identity provider or the record store, so it stays green
/// while either backend is down.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthReport {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}
