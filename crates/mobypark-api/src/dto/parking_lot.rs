//! Parking lot DTOs
//!
//! Request and response types for parking lot management endpoints.

use chrono::{DateTime, Utc};
use mobypark_core::models::ParkingLot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parking lot creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParkingLotCreateRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 300, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    pub postal_code: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(range(min = 0))]
    pub capacity: i32,

    /// Price per started hour; omitted means free hours
    pub hourly_rate: Option<Decimal>,

    /// Price per day; omitted means the legacy 999 cap
    pub daily_rate: Option<Decimal>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ParkingLotCreateRequest {
    /// Convert to ParkingLot entity; a new lot starts empty
    pub fn to_parking_lot(&self) -> ParkingLot {
        ParkingLot {
            id: 0,
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            total_capacity: self.capacity,
            available_spots: self.capacity,
            hourly_rate: self.hourly_rate,
            daily_rate: self.daily_rate,
            is_active: self.is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Parking lot update request
///
/// Absent fields are left unchanged. Rates can only be replaced, not
/// cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ParkingLotUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 300))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    pub postal_code: Option<String>,

    #[validate(range(min = 0))]
    pub capacity: Option<i32>,

    #[validate(range(min = 0))]
    pub available_spots: Option<i32>,

    pub hourly_rate: Option<Decimal>,

    pub daily_rate: Option<Decimal>,

    pub is_active: Option<bool>,
}

impl ParkingLotUpdateRequest {
    /// Apply the present fields to a lot
    pub fn apply(&self, lot: &mut ParkingLot) {
        if let Some(name) = &self.name {
            lot.name = name.clone();
        }
        if let Some(address) = &self.address {
            lot.address = address.clone();
        }
        if let Some(city) = &self.city {
            lot.city = city.clone();
        }
        if self.postal_code.is_some() {
            lot.postal_code = self.postal_code.clone();
        }
        if let Some(capacity) = self.capacity {
            lot.total_capacity = capacity;
        }
        if let Some(spots) = self.available_spots {
            lot.available_spots = spots;
        }
        if self.hourly_rate.is_some() {
            lot.hourly_rate = self.hourly_rate;
        }
        if self.daily_rate.is_some() {
            lot.daily_rate = self.daily_rate;
        }
        if let Some(active) = self.is_active {
            lot.is_active = active;
        }
    }
}

/// Parking lot response
#[derive(Debug, Clone, Serialize)]
pub struct ParkingLotResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: i32,
    pub available_spots: i32,
    pub hourly_rate: Option<Decimal>,
    pub daily_rate: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingLot> for ParkingLotResponse {
    fn from(lot: ParkingLot) -> Self {
        Self {
            id: lot.id,
            name: lot.name,
            address: lot.address,
            city: lot.city,
            postal_code: lot.postal_code,
            latitude: lot.latitude,
            longitude: lot.longitude,
            capacity: lot.total_capacity,
            available_spots: lot.available_spots,
            hourly_rate: lot.hourly_rate,
            daily_rate: lot.daily_rate,
            is_active: lot.is_active,
            created_at: lot.created_at,
            updated_at: lot.updated_at,
        }
    }
}
