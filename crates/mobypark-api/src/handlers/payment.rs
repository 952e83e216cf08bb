//! Payment handlers

use super::payment_service;
use crate::dto::payment::{PaymentCompleteRequest, PaymentCreateRequest, PaymentResponse};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use mobypark_core::AppError;
use sqlx::PgPool;
use tracing::{instrument, warn};
use validator::Validate;

/// Record a payment for a session
///
/// POST /api/v1/payments
#[instrument(skip(pool, req))]
pub async fn create_payment(
    pool: web::Data<PgPool>,
    req: web::Json<PaymentCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Payment validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let payment = payment_service(pool.get_ref())
        .create_payment(req.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        PaymentResponse::from(payment),
        "Payment recorded",
    )))
}

/// Payments recorded against a session
///
/// GET /api/v1/payments/session/{sid}
#[instrument(skip(pool))]
pub async fn list_session_payments(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let payments = payment_service(pool.get_ref())
        .list_for_session(path.into_inner())
        .await?;

    let response_data: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Complete a pending payment
///
/// PUT /api/v1/payments/{pid}
#[instrument(skip(pool, req))]
pub async fn complete_payment(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<PaymentCompleteRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Payment completion validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let payment = payment_service(pool.get_ref())
        .complete_payment(path.into_inner(), req.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        PaymentResponse::from(payment),
        "Payment completed",
    )))
}

/// Payments initiated by a user
///
/// GET /api/v1/users/{user_id}/payments
#[instrument(skip(pool))]
pub async fn list_user_payments(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let payments = payment_service(pool.get_ref())
        .list_for_user(path.into_inner(), query.limit(), query.offset())
        .await?;

    let response_data: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(create_payment))
            .route("/session/{sid}", web::get().to(list_session_payments))
            .route("/{pid}", web::put().to(complete_payment)),
    )
    .route("/users/{user_id}/payments", web::get().to(list_user_payments));
}
