//! Parking session repository implementation
//!
//! Sessions are always addressed through their parking lot, except for the
//! payment flow which looks them up by id alone.

use mobypark_core::{
    models::{BillableSession, ParkingSession, SessionStatus, TariffConfig},
    traits::SessionRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

/// PostgreSQL implementation of SessionRepository
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database status string to enum
    fn parse_status(s: &str, stopped: bool) -> SessionStatus {
        SessionStatus::from_str(s).unwrap_or(if stopped {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        })
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self))]
    async fn find_in_lot(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> AppResult<Option<ParkingSession>> {
        debug!("Finding session {} in lot {}", session_id, parking_lot_id);

        let result = sqlx::query_as::<sqlx::Postgres, SessionRow>(
            r#"
            SELECT
                id, parking_lot_id, vehicle_id, license_plate,
                start_date, stop_date, duration_minutes,
                cost_cents, billed_hours, billed_days, status, created_at
            FROM sessions
            WHERE parking_lot_id = $1 AND id = $2
            "#,
        )
        .bind(parking_lot_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding session {}: {}", session_id, e);
            AppError::Database(format!("Failed to find session: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_active(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> AppResult<Option<ParkingSession>> {
        debug!(
            "Finding running session {} in lot {}",
            session_id, parking_lot_id
        );

        let result = sqlx::query_as::<sqlx::Postgres, SessionRow>(
            r#"
            SELECT
                id, parking_lot_id, vehicle_id, license_plate,
                start_date, stop_date, duration_minutes,
                cost_cents, billed_hours, billed_days, status, created_at
            FROM sessions
            WHERE parking_lot_id = $1 AND id = $2 AND stop_date IS NULL
            "#,
        )
        .bind(parking_lot_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding running session {}: {}", session_id, e);
            AppError::Database(format!("Failed to find session: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, session_id: i32) -> AppResult<Option<ParkingSession>> {
        debug!("Finding session by id: {}", session_id);

        let result = sqlx::query_as::<sqlx::Postgres, SessionRow>(
            r#"
            SELECT
                id, parking_lot_id, vehicle_id, license_plate,
                start_date, stop_date, duration_minutes,
                cost_cents, billed_hours, billed_days, status, created_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding session {}: {}", session_id, e);
            AppError::Database(format!("Failed to find session: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, session), fields(lot = session.parking_lot_id))]
    async fn create(&self, session: &ParkingSession) -> AppResult<ParkingSession> {
        debug!("Creating session for plate {}", session.license_plate);

        let row = sqlx::query_as::<sqlx::Postgres, SessionRow>(
            r#"
            INSERT INTO sessions (
                parking_lot_id, vehicle_id, license_plate, start_date, status
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, parking_lot_id, vehicle_id, license_plate,
                start_date, stop_date, duration_minutes,
                cost_cents, billed_hours, billed_days, status, created_at
            "#,
        )
        .bind(session.parking_lot_id)
        .bind(session.vehicle_id)
        .bind(&session.license_plate)
        .bind(session.start_date)
        .bind(session.status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating session: {}", e);
            AppError::Database(format!("Failed to create session: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, session), fields(session_id = session.id))]
    async fn record_charge(&self, session: &ParkingSession) -> AppResult<Option<ParkingSession>> {
        debug!(
            "Recording charge of {} cents for session {}",
            session.cost_cents, session.id
        );

        // Guarded on stop_date so two concurrent stops cannot both win
        let result = sqlx::query_as::<sqlx::Postgres, SessionRow>(
            r#"
            UPDATE sessions
            SET stop_date = $3,
                duration_minutes = $4,
                cost_cents = $5,
                billed_hours = $6,
                billed_days = $7,
                status = $8
            WHERE id = $1 AND parking_lot_id = $2 AND stop_date IS NULL
            RETURNING
                id, parking_lot_id, vehicle_id, license_plate,
                start_date, stop_date, duration_minutes,
                cost_cents, billed_hours, billed_days, status, created_at
            "#,
        )
        .bind(session.id)
        .bind(session.parking_lot_id)
        .bind(session.stop_date)
        .bind(session.duration_minutes)
        .bind(session.cost_cents)
        .bind(session.billed_hours)
        .bind(session.billed_days)
        .bind(session.status.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error stopping session {}: {}", session.id, e);
            AppError::Database(format!("Failed to stop session: {}", e))
        })?;

        if result.is_none() {
            warn!("Session {} was already stopped", session.id);
        }

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_by_lot(
        &self,
        parking_lot_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ParkingSession>> {
        debug!(
            "Listing sessions of lot {} with limit {} offset {}",
            parking_lot_id, limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, SessionRow>(
            r#"
            SELECT
                id, parking_lot_id, vehicle_id, license_plate,
                start_date, stop_date, duration_minutes,
                cost_cents, billed_hours, billed_days, status, created_at
            FROM sessions
            WHERE parking_lot_id = $1
            ORDER BY start_date DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(parking_lot_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error listing sessions of lot {}: {}",
                parking_lot_id, e
            );
            AppError::Database(format!("Failed to fetch sessions: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_billable_by_user(&self, user_id: i32) -> AppResult<Vec<BillableSession>> {
        debug!("Listing billable sessions of user {}", user_id);

        let rows = sqlx::query_as::<sqlx::Postgres, BillableRow>(
            r#"
            SELECT
                s.id, s.parking_lot_id, s.vehicle_id, s.license_plate,
                s.start_date, s.stop_date, s.duration_minutes,
                s.cost_cents, s.billed_hours, s.billed_days, s.status, s.created_at,
                p.hourly_rate, p.daily_rate,
                v.license_plate AS vehicle_plate
            FROM sessions s
            JOIN vehicles v ON v.id = s.vehicle_id
            JOIN parking_lots p ON p.id = s.parking_lot_id
            WHERE v.user_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error listing billable sessions of user {}: {}",
                user_id, e
            );
            AppError::Database(format!("Failed to fetch sessions: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, parking_lot_id: i32, session_id: i32) -> AppResult<bool> {
        debug!("Deleting session {} of lot {}", session_id, parking_lot_id);

        let result = sqlx::query("DELETE FROM sessions WHERE parking_lot_id = $1 AND id = $2")
            .bind(parking_lot_id)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting session {}: {}", session_id, e);
                AppError::Database(format!("Failed to delete session: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: i32,
    parking_lot_id: i32,
    vehicle_id: Option<i32>,
    license_plate: String,
    start_date: DateTime<Utc>,
    stop_date: Option<DateTime<Utc>>,
    duration_minutes: Option<i64>,
    cost_cents: i64,
    billed_hours: i64,
    billed_days: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for ParkingSession {
    fn from(row: SessionRow) -> Self {
        Self {
            status: PgSessionRepository::parse_status(&row.status, row.stop_date.is_some()),
            id: row.id,
            parking_lot_id: row.parking_lot_id,
            vehicle_id: row.vehicle_id,
            license_plate: row.license_plate,
            start_date: row.start_date,
            stop_date: row.stop_date,
            duration_minutes: row.duration_minutes,
            cost_cents: row.cost_cents,
            billed_hours: row.billed_hours,
            billed_days: row.billed_days,
            created_at: row.created_at,
        }
    }
}

/// Session row joined with its lot's tariff and its vehicle's plate
#[derive(Debug, sqlx::FromRow)]
struct BillableRow {
    #[sqlx(flatten)]
    session: SessionRow,
    hourly_rate: Option<Decimal>,
    daily_rate: Option<Decimal>,
    vehicle_plate: String,
}

impl From<BillableRow> for BillableSession {
    fn from(row: BillableRow) -> Self {
        Self {
            session: row.session.into(),
            tariff: TariffConfig::new(row.hourly_rate, row.daily_rate),
            license_plate: row.vehicle_plate,
        }
    }
}
