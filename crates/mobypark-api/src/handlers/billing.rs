//! Billing handlers

use super::billing_service;
use crate::dto::billing::BillingResponse;
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use mobypark_core::traits::BillingService;
use mobypark_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

/// Billing summary of a user
///
/// GET /api/v1/billing/{user_id}
#[instrument(skip(pool))]
pub async fn get_billing(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let summary = billing_service(pool.get_ref())
        .summary_for_user(user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(BillingResponse::new(user_id, summary))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/billing/{user_id}", web::get().to(get_billing));
}
