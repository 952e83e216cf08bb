//! Vehicle model
//!
//! Vehicles keep the license plate as entered alongside a cleaned form used
//! for lookups and de-duplication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier
    pub id: i32,

    /// Owner
    pub user_id: i32,

    /// License plate as entered
    pub license_plate: String,

    /// Cleaned license plate, unique across vehicles
    pub license_plate_clean: String,

    pub make: Option<String>,

    pub model: Option<String>,

    pub color: Option<String>,

    pub year: Option<i32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Create a vehicle, deriving the cleaned plate
    pub fn new(user_id: i32, license_plate: impl Into<String>) -> Self {
        let license_plate = license_plate.into();
        Self {
            id: 0,
            user_id,
            license_plate_clean: Self::clean_license_plate(&license_plate),
            license_plate,
            make: None,
            model: None,
            color: None,
            year: None,
            created_at: Utc::now(),
        }
    }

    /// Normalize a license plate for matching
    ///
    /// Strips whitespace and hyphens and uppercases the rest. Not used for
    /// the legacy payment hash, which takes the plate as entered.
    pub fn clean_license_plate(plate: &str) -> String {
        plate
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_uppercase)
            .collect()
    }
}
