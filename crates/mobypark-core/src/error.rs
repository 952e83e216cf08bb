//! Unified error handling for MobyPark
//!
//! This module provides a single error type that covers every failure
//! scenario of the backend, with automatic HTTP response mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    // ==================== Pricing Errors ====================
    /// A parking lot carries a negative hourly or daily rate.
    ///
    /// This is a configuration error of the lot, not of the request, and is
    /// never defaulted or retried.
    #[error("Invalid tariff configuration: {0}")]
    InvalidTariff(String),

    #[error("Invalid session interval: {0}")]
    InvalidInterval(String),

    // ==================== Business Logic Errors ====================
    #[error("Parking lot not found: {0}")]
    ParkingLotNotFound(String),

    #[error("Parking lot is not active: {0}")]
    ParkingLotInactive(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Payments can only be made once the session is stopped and priced
    #[error("Session is still running: {0}")]
    SessionStillActive(String),

    #[error("Payment already completed: {0}")]
    PaymentAlreadyCompleted(String),

    // ==================== Authorization Errors ====================
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidTariff(_)
            | AppError::InvalidInterval(_)
            | AppError::PaymentAlreadyCompleted(_) => StatusCode::BAD_REQUEST,

            // 403 Forbidden
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::ParkingLotNotFound(_)
            | AppError::SessionNotFound(_)
            | AppError::VehicleNotFound(_)
            | AppError::PaymentNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Conflict(_)
            | AppError::AlreadyExists(_)
            | AppError::ParkingLotInactive(_)
            | AppError::SessionStillActive(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Migration(_) => "migration_error",
            AppError::InvalidTariff(_) => "invalid_tariff",
            AppError::InvalidInterval(_) => "invalid_interval",
            AppError::ParkingLotNotFound(_) => "parking_lot_not_found",
            AppError::ParkingLotInactive(_) => "parking_lot_inactive",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::VehicleNotFound(_) => "vehicle_not_found",
            AppError::PaymentNotFound(_) => "payment_not_found",
            AppError::SessionStillActive(_) => "session_active",
            AppError::PaymentAlreadyCompleted(_) => "payment_already_completed",
            AppError::Forbidden(_) => "forbidden",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidTariff("daily rate -20".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SessionNotFound("7".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ParkingLotInactive("3".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("connection reset".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::InvalidTariff(String::new()).error_code(),
            "invalid_tariff"
        );
        assert_eq!(
            AppError::ParkingLotNotFound("1".to_string()).error_code(),
            "parking_lot_not_found"
        );
    }

    #[test]
    fn test_payment_workflow_errors() {
        assert_eq!(
            AppError::Forbidden("payment 4".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::PaymentAlreadyCompleted("4".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PaymentNotFound("4".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::SessionStillActive("9".to_string()).error_code(),
            "session_active"
        );
    }

    #[test]
    fn test_tariff_error_is_distinct_from_interval_error() {
        let tariff = AppError::InvalidTariff("hourly rate -1".to_string());
        let interval = AppError::InvalidInterval("stop before start".to_string());

        assert_ne!(tariff.error_code(), interval.error_code());
        assert!(tariff.to_string().starts_with("Invalid tariff configuration"));
    }
}
