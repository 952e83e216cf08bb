//! Vehicle repository implementation

use mobypark_core::{
    models::Vehicle,
    traits::{Repository, VehicleRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use super::is_unique_violation;

/// PostgreSQL implementation of VehicleRepository
pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    /// Create a new vehicle repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Vehicle, i32> for PgVehicleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        debug!("Finding vehicle by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, user_id, license_plate, license_plate_clean,
                make, model, color, year, created_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicle {}: {}", id, e);
            AppError::Database(format!("Failed to find vehicle: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, user_id, license_plate, license_plate_clean,
                make, model, color, year, created_at
            FROM vehicles
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicles: {}", e);
            AppError::Database(format!("Failed to fetch vehicles: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting vehicles: {}", e);
                AppError::Database(format!("Failed to count vehicles: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        debug!("Creating vehicle: {}", entity.license_plate_clean);

        let row = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            INSERT INTO vehicles (
                user_id, license_plate, license_plate_clean,
                make, model, color, year
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, user_id, license_plate, license_plate_clean,
                make, model, color, year, created_at
            "#,
        )
        .bind(entity.user_id)
        .bind(&entity.license_plate)
        .bind(&entity.license_plate_clean)
        .bind(&entity.make)
        .bind(&entity.model)
        .bind(&entity.color)
        .bind(entity.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating vehicle: {}", e);
            if is_unique_violation(&e) {
                AppError::AlreadyExists(format!(
                    "Vehicle {} already registered",
                    entity.license_plate
                ))
            } else {
                AppError::Database(format!("Failed to create vehicle: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        debug!("Updating vehicle: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            UPDATE vehicles
            SET license_plate = $2,
                license_plate_clean = $3,
                make = $4,
                model = $5,
                color = $6,
                year = $7
            WHERE id = $1
            RETURNING
                id, user_id, license_plate, license_plate_clean,
                make, model, color, year, created_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.license_plate)
        .bind(&entity.license_plate_clean)
        .bind(&entity.make)
        .bind(&entity.model)
        .bind(&entity.color)
        .bind(entity.year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating vehicle {}: {}", entity.id, e);
            if is_unique_violation(&e) {
                AppError::AlreadyExists(format!(
                    "Vehicle {} already registered",
                    entity.license_plate
                ))
            } else {
                AppError::Database(format!("Failed to update vehicle: {}", e))
            }
        })?
        .ok_or_else(|| AppError::VehicleNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting vehicle: {}", id);

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting vehicle {}: {}", id, e);
                AppError::Database(format!("Failed to delete vehicle: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    #[instrument(skip(self))]
    async fn find_by_clean_plate(&self, plate_clean: &str) -> AppResult<Option<Vehicle>> {
        debug!("Finding vehicle by plate: {}", plate_clean);

        let result = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, user_id, license_plate, license_plate_clean,
                make, model, color, year, created_at
            FROM vehicles
            WHERE license_plate_clean = $1
            "#,
        )
        .bind(plate_clean)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding vehicle by plate: {}", e);
            AppError::Database(format!("Failed to find vehicle: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: i32, limit: i64, offset: i64) -> AppResult<Vec<Vehicle>> {
        debug!("Listing vehicles of user {}", user_id);

        let rows = sqlx::query_as::<sqlx::Postgres, VehicleRow>(
            r#"
            SELECT
                id, user_id, license_plate, license_plate_clean,
                make, model, color, year, created_at
            FROM vehicles
            WHERE user_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing vehicles of user {}: {}", user_id, e);
            AppError::Database(format!("Failed to fetch vehicles: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: i32,
    user_id: i32,
    license_plate: String,
    license_plate_clean: String,
    make: Option<String>,
    model: Option<String>,
    color: Option<String>,
    year: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            license_plate: row.license_plate,
            license_plate_clean: row.license_plate_clean,
            make: row.make,
            model: row.model,
            color: row.color,
            year: row.year,
            created_at: row.created_at,
        }
    }
}
