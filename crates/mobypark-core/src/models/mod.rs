//! Domain models for MobyPark
//!
//! This module contains all the core domain models used throughout the application.

pub mod billing;
pub mod parking_lot;
pub mod payment;
pub mod session;
pub mod tariff;
pub mod vehicle;

pub use billing::{BillableSession, BillingSummary};
pub use parking_lot::ParkingLot;
pub use payment::PaymentRecord;
pub use session::{ParkingSession, SessionInterval, SessionStatus};
pub use tariff::{Charge, TariffConfig, GRACE_PERIOD_SECS, MISSING_DAILY_RATE};
pub use vehicle::Vehicle;
