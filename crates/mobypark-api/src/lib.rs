//! API layer for MobyPark
//!
//! HTTP handlers for parking lots, sessions, payments, vehicles and billing.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{
    configure_billing, configure_health, configure_parking_lots, configure_payments,
    configure_vehicles,
};
