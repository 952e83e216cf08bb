//! Session handlers
//!
//! Session endpoints live under `/parking-lots/{lid}/sessions`.

use super::session_manager;
use crate::dto::session::{ChargeResponse, SessionResponse, SessionStartRequest};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use mobypark_core::AppError;
use sqlx::PgPool;
use tracing::{instrument, warn};
use validator::Validate;

/// List the sessions of a lot
///
/// GET /api/v1/parking-lots/{lid}/sessions
#[instrument(skip(pool))]
pub async fn list_sessions(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let sessions = session_manager(pool.get_ref())
        .list_sessions(path.into_inner(), query.limit(), query.offset())
        .await?;

    let response_data: Vec<SessionResponse> = sessions.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Start a session
///
/// POST /api/v1/parking-lots/{lid}/sessions/start
#[instrument(skip(pool, req))]
pub async fn start_session(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<SessionStartRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Session start validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let session = session_manager(pool.get_ref())
        .start_session(path.into_inner(), req.vehicle_id)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        SessionResponse::from(session),
        "Session started",
    )))
}

/// Stop a session and charge it
///
/// POST /api/v1/parking-lots/{lid}/sessions/{sid}/stop
#[instrument(skip(pool))]
pub async fn stop_session(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (lot_id, session_id) = path.into_inner();

    let session = session_manager(pool.get_ref())
        .stop_session(lot_id, session_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        SessionResponse::from(session),
        "Session stopped",
    )))
}

/// Get a session
///
/// GET /api/v1/parking-lots/{lid}/sessions/{sid}
#[instrument(skip(pool))]
pub async fn get_session(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (lot_id, session_id) = path.into_inner();

    let session = session_manager(pool.get_ref())
        .get_session(lot_id, session_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SessionResponse::from(session))))
}

/// Charge of a session so far
///
/// GET /api/v1/parking-lots/{lid}/sessions/{sid}/charge
#[instrument(skip(pool))]
pub async fn get_running_charge(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (lot_id, session_id) = path.into_inner();

    let charge = session_manager(pool.get_ref())
        .running_charge(lot_id, session_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(ChargeResponse::new(session_id, charge))))
}

/// Delete a session
///
/// DELETE /api/v1/parking-lots/{lid}/sessions/{sid}
#[instrument(skip(pool))]
pub async fn delete_session(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (lot_id, session_id) = path.into_inner();

    session_manager(pool.get_ref())
        .delete_session(lot_id, session_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Registered inside the `/parking-lots` scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/{lid}/sessions", web::get().to(list_sessions))
        .route("/{lid}/sessions/start", web::post().to(start_session))
        .route("/{lid}/sessions/{sid}", web::get().to(get_session))
        .route("/{lid}/sessions/{sid}", web::delete().to(delete_session))
        .route("/{lid}/sessions/{sid}/stop", web::post().to(stop_session))
        .route("/{lid}/sessions/{sid}/charge", web::get().to(get_running_charge));
}
