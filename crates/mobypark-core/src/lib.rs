//! MobyPark Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the MobyPark parking backend. It includes:
//!
//! - Domain models (ParkingLot, ParkingSession, PaymentRecord, Vehicle)
//! - The price calculator that turns a tariff and a session interval into a charge
//! - Legacy payment hashing and license plate normalization
//! - Common traits for repositories and services
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
