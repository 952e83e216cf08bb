//! Health check handler

use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::warn;

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => "up",
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            "down"
        }
    };

    let body = serde_json::json!({
        "status": if database == "up" { "healthy" } else { "degraded" },
        "service": "mobypark",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    });

    if database == "up" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
