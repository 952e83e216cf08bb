//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic.

use crate::error::AppError;
use crate::models::{
    BillableSession, BillingSummary, Charge, ParkingLot, ParkingSession, PaymentRecord,
    TariffConfig, Vehicle,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Parking lot repository trait with specialized methods
#[async_trait]
pub trait ParkingLotRepository: Repository<ParkingLot, i32> {
    /// Read the current tariff of a lot
    async fn find_tariff(&self, parking_lot_id: i32) -> Result<Option<TariffConfig>, AppError>;
}

/// Vehicle repository trait with specialized methods
#[async_trait]
pub trait VehicleRepository: Repository<Vehicle, i32> {
    /// Find vehicle by cleaned license plate
    async fn find_by_clean_plate(&self, plate_clean: &str) -> Result<Option<Vehicle>, AppError>;

    /// List the vehicles owned by a user
    async fn list_by_user(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Vehicle>, AppError>;
}

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find session by ID within a parking lot
    async fn find_in_lot(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> Result<Option<ParkingSession>, AppError>;

    /// Find a running session by ID within a parking lot
    async fn find_active(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> Result<Option<ParkingSession>, AppError>;

    /// Find session by ID in any lot
    async fn find_by_id(&self, session_id: i32) -> Result<Option<ParkingSession>, AppError>;

    /// Persist a new running session
    async fn create(&self, session: &ParkingSession) -> Result<ParkingSession, AppError>;

    /// Persist the stop time and charge of a session
    ///
    /// Only applies to sessions that are still running; returns `None` if
    /// the session was stopped concurrently.
    async fn record_charge(
        &self,
        session: &ParkingSession,
    ) -> Result<Option<ParkingSession>, AppError>;

    /// List sessions of a lot
    async fn list_by_lot(
        &self,
        parking_lot_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ParkingSession>, AppError>;

    /// Every session of a user's vehicles, joined with lot tariff and plate
    async fn list_billable_by_user(&self, user_id: i32) -> Result<Vec<BillableSession>, AppError>;

    /// Delete a session of a lot
    async fn delete(&self, parking_lot_id: i32, session_id: i32) -> Result<bool, AppError>;
}

/// Payment ledger trait
///
/// Amounts are in cents. Sums over no rows are zero, not errors.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Sum of payments recorded against a session id
    async fn sum_amount_by_session(&self, session_id: i32) -> Result<i64, AppError>;

    /// Sum of payments recorded under a legacy hash
    async fn sum_amount_by_hash(&self, hash: &str) -> Result<i64, AppError>;

    /// Append a payment
    async fn create(&self, payment: &PaymentRecord) -> Result<PaymentRecord, AppError>;

    /// Payments recorded against a session id
    async fn list_by_session(&self, session_id: i32) -> Result<Vec<PaymentRecord>, AppError>;

    async fn find_by_id(&self, payment_id: i32) -> Result<Option<PaymentRecord>, AppError>;

    /// Payments initiated by a user, most recent first
    async fn list_by_initiator(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentRecord>, AppError>;

    /// Set `completed_at` on a pending payment
    ///
    /// Returns None when the payment does not exist or is already completed.
    async fn complete(
        &self,
        payment_id: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<PaymentRecord>, AppError>;
}

/// Pricing service trait
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Tariff of a parking lot
    async fn tariff_for(&self, parking_lot_id: i32) -> Result<TariffConfig, AppError>;

    /// Charge of a session at a parking lot, using `now` while it runs
    async fn price_session(
        &self,
        parking_lot_id: i32,
        session: &ParkingSession,
        now: DateTime<Utc>,
    ) -> Result<Charge, AppError>;
}

/// Settlement service trait
#[async_trait]
pub trait SettlementService: Send + Sync {
    /// Amount paid for a session in euros
    async fn sum_paid(&self, session_id: i32, legacy_key: &str) -> Result<Decimal, AppError>;
}

/// Billing service trait
#[async_trait]
pub trait BillingService: Send + Sync {
    /// Charged versus paid totals across a user's sessions
    async fn summary_for_user(&self, user_id: i32) -> Result<BillingSummary, AppError>;
}
