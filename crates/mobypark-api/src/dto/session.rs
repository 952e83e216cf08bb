//! Session DTOs

use chrono::{DateTime, Utc};
use mobypark_core::models::{Charge, ParkingSession};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Session start request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionStartRequest {
    /// Vehicle to park
    #[validate(range(min = 1))]
    pub vehicle_id: i32,
}

/// Session response
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: i32,
    pub parking_lot_id: i32,
    pub vehicle_id: Option<i32>,
    pub license_plate: String,
    pub started: DateTime<Utc>,
    pub stopped: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,

    /// Stored cost in euros
    pub cost: Decimal,

    pub billed_hours: i64,
    pub billed_days: i64,
    pub status: String,
}

impl From<ParkingSession> for SessionResponse {
    fn from(session: ParkingSession) -> Self {
        Self {
            cost: session.cost(),
            status: session.status.to_string(),
            id: session.id,
            parking_lot_id: session.parking_lot_id,
            vehicle_id: session.vehicle_id,
            license_plate: session.license_plate,
            started: session.start_date,
            stopped: session.stop_date,
            duration_minutes: session.duration_minutes,
            billed_hours: session.billed_hours,
            billed_days: session.billed_days,
        }
    }
}

/// Charge of a session so far
#[derive(Debug, Clone, Serialize)]
pub struct ChargeResponse {
    pub session_id: i32,
    pub amount: Decimal,
    pub billed_hours: i64,
    pub billed_days: i64,
}

impl ChargeResponse {
    pub fn new(session_id: i32, charge: Charge) -> Self {
        Self {
            session_id,
            amount: charge.amount,
            billed_hours: charge.billed_hours,
            billed_days: charge.billed_days,
        }
    }
}
