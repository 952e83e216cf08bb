//! Vehicle DTOs

use chrono::{DateTime, Utc};
use mobypark_core::models::Vehicle;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Vehicle registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleCreateRequest {
    /// Owner
    #[validate(range(min = 1))]
    pub user_id: i32,

    #[validate(length(min = 1, max = 20, message = "License plate is required"))]
    pub license_plate: String,

    #[validate(length(max = 50))]
    pub make: Option<String>,

    #[validate(length(max = 50))]
    pub model: Option<String>,

    #[validate(length(max = 30))]
    pub color: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
}

impl VehicleCreateRequest {
    /// Convert to Vehicle entity
    pub fn to_vehicle(&self) -> Vehicle {
        Vehicle {
            make: self.make.clone(),
            model: self.model.clone(),
            color: self.color.clone(),
            year: self.year,
            ..Vehicle::new(self.user_id, self.license_plate.clone())
        }
    }
}

/// Vehicle response
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    pub id: i32,
    pub user_id: i32,
    pub license_plate: String,
    pub license_plate_clean: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            user_id: vehicle.user_id,
            license_plate: vehicle.license_plate,
            license_plate_clean: vehicle.license_plate_clean,
            make: vehicle.make,
            model: vehicle.model,
            color: vehicle.color,
            year: vehicle.year,
            created_at: vehicle.created_at,
        }
    }
}
