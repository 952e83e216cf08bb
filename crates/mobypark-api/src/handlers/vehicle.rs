//! Vehicle handlers

use crate::dto::vehicle::{VehicleCreateRequest, VehicleResponse};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use mobypark_core::traits::{Repository, VehicleRepository};
use mobypark_core::AppError;
use mobypark_db::PgVehicleRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Register a vehicle
///
/// POST /api/v1/vehicles
#[instrument(skip(pool, req))]
pub async fn create_vehicle(
    pool: web::Data<PgPool>,
    req: web::Json<VehicleCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Vehicle validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let vehicle = req.to_vehicle();
    if vehicle.license_plate_clean.is_empty() {
        return Err(AppError::Validation(
            "License plate has no characters besides spaces and hyphens".to_string(),
        ));
    }

    debug!(plate = %vehicle.license_plate_clean, "Registering vehicle");

    let repo = PgVehicleRepository::new(pool.get_ref().clone());

    if repo
        .find_by_clean_plate(&vehicle.license_plate_clean)
        .await?
        .is_some()
    {
        warn!(plate = %vehicle.license_plate_clean, "Vehicle registration failed: duplicate plate");
        return Err(AppError::AlreadyExists(format!(
            "Vehicle {} already registered",
            vehicle.license_plate
        )));
    }

    let created = repo.create(&vehicle).await?;

    info!(id = created.id, user_id = created.user_id, "Vehicle registered");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        VehicleResponse::from(created),
        "Vehicle registered successfully",
    )))
}

/// List the vehicles of a user
///
/// GET /api/v1/users/{user_id}/vehicles
#[instrument(skip(pool))]
pub async fn list_user_vehicles(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    let vehicles = repo
        .list_by_user(path.into_inner(), query.limit(), query.offset())
        .await?;

    let response_data: Vec<VehicleResponse> = vehicles.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Get a single vehicle
///
/// GET /api/v1/vehicles/{id}
#[instrument(skip(pool))]
pub async fn get_vehicle(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner();

    let repo = PgVehicleRepository::new(pool.get_ref().clone());
    let vehicle = repo
        .find_by_id(vehicle_id)
        .await?
        .ok_or_else(|| AppError::VehicleNotFound(vehicle_id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .route("", web::post().to(create_vehicle))
            .route("/{id}", web::get().to(get_vehicle)),
    )
    .route("/users/{user_id}/vehicles", web::get().to(list_user_vehicles));
}
