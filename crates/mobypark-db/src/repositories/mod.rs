//! Repository implementations
//!
//! Concrete implementations of the repository traits defined in
//! mobypark-core, using sqlx for PostgreSQL access.

pub mod parking_lot_repo;
pub mod payment_repo;
pub mod session_repo;
pub mod vehicle_repo;

pub use parking_lot_repo::PgParkingLotRepository;
pub use payment_repo::PgPaymentLedger;
pub use session_repo::PgSessionRepository;
pub use vehicle_repo::PgVehicleRepository;

/// Whether a driver error is a unique constraint violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
