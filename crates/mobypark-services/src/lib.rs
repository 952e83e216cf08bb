//! Business logic services for MobyPark
//!
//! This crate contains the services that orchestrate parking operations:
//! pricing sessions against their lot's tariff, running the session
//! lifecycle, recording payments and reconciling them into billing
//! summaries.
//!
//! # Architecture
//!
//! Services are generic over the repository traits of `mobypark-core`:
//! - Each service owns its dependencies behind `Arc`
//! - Services are `Send + Sync` and shared across actix workers
//! - All operations are instrumented with tracing
//!
//! # Services
//!
//! - `PricingServiceImpl` - Tariff lookup and session pricing
//! - `SettlementReconciler` - Amount paid per session, with legacy fallback
//! - `BillingServiceImpl` - Charged versus paid totals per user
//! - `SessionManager` - Session start, stop and running charge
//! - `PaymentService` - Payment recording

pub mod billing;
pub mod payment;
pub mod pricing;
pub mod session_manager;
pub mod settlement;

pub use billing::BillingServiceImpl;
pub use payment::{NewPayment, PaymentService};
pub use pricing::PricingServiceImpl;
pub use session_manager::SessionManager;
pub use settlement::SettlementReconciler;

#[cfg(test)]
pub(crate) mod mock;
