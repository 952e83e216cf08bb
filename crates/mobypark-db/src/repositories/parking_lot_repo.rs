//! Parking lot repository implementation
//!
//! Stores lots together with their tariff. The tariff is read fresh on every
//! pricing call so a stop is priced against the rates in force at that moment.

use mobypark_core::{
    models::{ParkingLot, TariffConfig},
    traits::{ParkingLotRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of ParkingLotRepository
pub struct PgParkingLotRepository {
    pool: PgPool,
}

impl PgParkingLotRepository {
    /// Create a new parking lot repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<ParkingLot, i32> for PgParkingLotRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ParkingLot>> {
        debug!("Finding parking lot by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ParkingLotRow>(
            r#"
            SELECT
                id, name, address, city, postal_code,
                latitude, longitude, total_capacity, available_spots,
                hourly_rate, daily_rate, is_active,
                created_at, updated_at
            FROM parking_lots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding parking lot {}: {}", id, e);
            AppError::Database(format!("Failed to find parking lot: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<ParkingLot>> {
        debug!(
            "Finding all parking lots with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, ParkingLotRow>(
            r#"
            SELECT
                id, name, address, city, postal_code,
                latitude, longitude, total_capacity, available_spots,
                hourly_rate, daily_rate, is_active,
                created_at, updated_at
            FROM parking_lots
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding parking lots: {}", e);
            AppError::Database(format!("Failed to fetch parking lots: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM parking_lots")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting parking lots: {}", e);
                AppError::Database(format!("Failed to count parking lots: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &ParkingLot) -> AppResult<ParkingLot> {
        debug!("Creating parking lot: {}", entity.name);

        let row = sqlx::query_as::<sqlx::Postgres, ParkingLotRow>(
            r#"
            INSERT INTO parking_lots (
                name, address, city, postal_code, latitude, longitude,
                total_capacity, available_spots, hourly_rate, daily_rate, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                id, name, address, city, postal_code,
                latitude, longitude, total_capacity, available_spots,
                hourly_rate, daily_rate, is_active,
                created_at, updated_at
            "#,
        )
        .bind(&entity.name)
        .bind(&entity.address)
        .bind(&entity.city)
        .bind(&entity.postal_code)
        .bind(entity.latitude)
        .bind(entity.longitude)
        .bind(entity.total_capacity)
        .bind(entity.available_spots)
        .bind(entity.hourly_rate)
        .bind(entity.daily_rate)
        .bind(entity.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating parking lot: {}", e);
            AppError::Database(format!("Failed to create parking lot: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &ParkingLot) -> AppResult<ParkingLot> {
        debug!("Updating parking lot: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, ParkingLotRow>(
            r#"
            UPDATE parking_lots
            SET name = $2,
                address = $3,
                city = $4,
                postal_code = $5,
                latitude = $6,
                longitude = $7,
                total_capacity = $8,
                available_spots = $9,
                hourly_rate = $10,
                daily_rate = $11,
                is_active = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, address, city, postal_code,
                latitude, longitude, total_capacity, available_spots,
                hourly_rate, daily_rate, is_active,
                created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.address)
        .bind(&entity.city)
        .bind(&entity.postal_code)
        .bind(entity.latitude)
        .bind(entity.longitude)
        .bind(entity.total_capacity)
        .bind(entity.available_spots)
        .bind(entity.hourly_rate)
        .bind(entity.daily_rate)
        .bind(entity.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating parking lot {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update parking lot: {}", e))
        })?
        .ok_or_else(|| AppError::ParkingLotNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting parking lot: {}", id);

        let result = sqlx::query("DELETE FROM parking_lots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting parking lot {}: {}", id, e);
                AppError::Database(format!("Failed to delete parking lot: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ParkingLotRepository for PgParkingLotRepository {
    #[instrument(skip(self))]
    async fn find_tariff(&self, parking_lot_id: i32) -> AppResult<Option<TariffConfig>> {
        debug!("Reading tariff of parking lot {}", parking_lot_id);

        let result: Option<(Option<Decimal>, Option<Decimal>)> = sqlx::query_as(
            "SELECT hourly_rate, daily_rate FROM parking_lots WHERE id = $1",
        )
        .bind(parking_lot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error reading tariff of parking lot {}: {}",
                parking_lot_id, e
            );
            AppError::Database(format!("Failed to read tariff: {}", e))
        })?;

        Ok(result.map(|(hourly, daily)| TariffConfig::new(hourly, daily)))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ParkingLotRow {
    id: i32,
    name: String,
    address: String,
    city: String,
    postal_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    total_capacity: i32,
    available_spots: i32,
    hourly_rate: Option<Decimal>,
    daily_rate: Option<Decimal>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ParkingLotRow> for ParkingLot {
    fn from(row: ParkingLotRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            postal_code: row.postal_code,
            latitude: row.latitude,
            longitude: row.longitude,
            total_capacity: row.total_capacity,
            available_spots: row.available_spots,
            hourly_rate: row.hourly_rate,
            daily_rate: row.daily_rate,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
