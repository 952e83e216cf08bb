//! HTTP request handlers
//!
//! Handlers build their repositories and services from the shared `PgPool`
//! per request.

pub mod billing;
pub mod health;
pub mod parking_lot;
pub mod payment;
pub mod session;
pub mod vehicle;

pub use billing::configure as configure_billing;
pub use health::configure as configure_health;
pub use parking_lot::configure as configure_parking_lots;
pub use payment::configure as configure_payments;
pub use vehicle::configure as configure_vehicles;

use mobypark_db::{PgParkingLotRepository, PgPaymentLedger, PgSessionRepository, PgVehicleRepository};
use mobypark_services::{BillingServiceImpl, PaymentService, SessionManager, SettlementReconciler};
use sqlx::PgPool;
use std::sync::Arc;

/// Session manager over PostgreSQL repositories
pub type PgSessionManager =
    SessionManager<PgParkingLotRepository, PgSessionRepository, PgVehicleRepository>;

/// Payment service over PostgreSQL repositories
pub type PgPaymentService = PaymentService<PgSessionRepository, PgVehicleRepository, PgPaymentLedger>;

/// Billing service over PostgreSQL repositories
pub type PgBillingService =
    BillingServiceImpl<PgSessionRepository, SettlementReconciler<PgPaymentLedger>>;

pub(crate) fn session_manager(pool: &PgPool) -> PgSessionManager {
    SessionManager::new(
        Arc::new(PgParkingLotRepository::new(pool.clone())),
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgVehicleRepository::new(pool.clone())),
    )
}

pub(crate) fn payment_service(pool: &PgPool) -> PgPaymentService {
    PaymentService::new(
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgVehicleRepository::new(pool.clone())),
        Arc::new(PgPaymentLedger::new(pool.clone())),
    )
}

pub(crate) fn billing_service(pool: &PgPool) -> PgBillingService {
    let ledger = Arc::new(PgPaymentLedger::new(pool.clone()));
    BillingServiceImpl::new(
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(SettlementReconciler::new(ledger)),
    )
}
