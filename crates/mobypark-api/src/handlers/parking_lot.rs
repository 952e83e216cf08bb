//! Parking lot handlers
//!
//! HTTP handlers for parking lot management endpoints. Session endpoints are
//! nested under each lot, see [`super::session`].

use crate::dto::parking_lot::{ParkingLotCreateRequest, ParkingLotResponse, ParkingLotUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use mobypark_core::models::ParkingLot;
use mobypark_core::traits::Repository;
use mobypark_core::AppError;
use mobypark_db::PgParkingLotRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Reject lots whose rates or capacity cannot be stored
fn check_lot(lot: &ParkingLot) -> Result<(), AppError> {
    lot.tariff().validate()?;

    if !lot.capacity_is_consistent() {
        return Err(AppError::Validation(format!(
            "available spots {} must be between 0 and capacity {}",
            lot.available_spots, lot.total_capacity
        )));
    }

    Ok(())
}

/// List parking lots with pagination
///
/// GET /api/v1/parking-lots
#[instrument(skip(pool))]
pub async fn list_parking_lots(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgParkingLotRepository::new(pool.get_ref().clone());

    let lots = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<ParkingLotResponse> = lots.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new parking lot
///
/// POST /api/v1/parking-lots
#[instrument(skip(pool, req))]
pub async fn create_parking_lot(
    pool: web::Data<PgPool>,
    req: web::Json<ParkingLotCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Parking lot validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let lot = req.to_parking_lot();
    check_lot(&lot)?;

    debug!(name = %lot.name, "Creating parking lot");

    let repo = PgParkingLotRepository::new(pool.get_ref().clone());
    let created = repo.create(&lot).await?;

    info!(id = created.id, name = %created.name, "Parking lot created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        ParkingLotResponse::from(created),
        "Parking lot created successfully",
    )))
}

/// Get a single parking lot
///
/// GET /api/v1/parking-lots/{lid}
#[instrument(skip(pool))]
pub async fn get_parking_lot(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let lot_id = path.into_inner();

    let repo = PgParkingLotRepository::new(pool.get_ref().clone());
    let lot = repo
        .find_by_id(lot_id)
        .await?
        .ok_or_else(|| AppError::ParkingLotNotFound(lot_id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(ParkingLotResponse::from(lot))))
}

/// Update a parking lot
///
/// PUT /api/v1/parking-lots/{lid}
#[instrument(skip(pool, req))]
pub async fn update_parking_lot(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<ParkingLotUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let lot_id = path.into_inner();

    req.validate().map_err(|e| {
        warn!("Parking lot update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgParkingLotRepository::new(pool.get_ref().clone());
    let mut lot = repo
        .find_by_id(lot_id)
        .await?
        .ok_or_else(|| AppError::ParkingLotNotFound(lot_id.to_string()))?;

    req.apply(&mut lot);
    check_lot(&lot)?;

    let updated = repo.update(&lot).await?;

    info!(id = updated.id, "Parking lot updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        ParkingLotResponse::from(updated),
        "Parking lot updated successfully",
    )))
}

/// Delete a parking lot and its sessions
///
/// DELETE /api/v1/parking-lots/{lid}
#[instrument(skip(pool))]
pub async fn delete_parking_lot(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let lot_id = path.into_inner();

    let repo = PgParkingLotRepository::new(pool.get_ref().clone());
    if !repo.delete(lot_id).await? {
        return Err(AppError::ParkingLotNotFound(lot_id.to_string()));
    }

    info!(id = lot_id, "Parking lot deleted");

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/parking-lots")
            .route("", web::get().to(list_parking_lots))
            .route("", web::post().to(create_parking_lot))
            .configure(super::session::configure)
            .route("/{lid}", web::get().to(get_parking_lot))
            .route("/{lid}", web::put().to(update_parking_lot))
            .route("/{lid}", web::delete().to(delete_parking_lot)),
    );
}
