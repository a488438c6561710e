use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::app_state::AppState;

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Probes the cache with a throwaway read. MongoDB is checked once at
/// startup; a dead Redis flips readiness so the instance drops out of
/// rotation until it recovers.
#[get("/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let cache_health = state.cache_store.get("health:ping").await;
    if let Err(ref e) = cache_health {
        log::warn!("Readiness probe failed: {}", e);
    }

    let response = json!({
        "status": if cache_health.is_ok() { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "redis": if cache_health.is_ok() { "ok" } else { "error" }
        }
    });

    if cache_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
