use actix_web::{get, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Liveness report for the running process.
#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

/// Answers without touching the database, so it reports process liveness
/// only. It is exempt from authentication.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}
