//! Parking lot model
//!
//! A parking lot carries its own tariff; pricing reads it through
//! [`ParkingLot::tariff`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tariff::TariffConfig;

/// Parking lot entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLot {
    /// Unique identifier
    pub id: i32,

    pub name: String,

    pub address: String,

    pub city: String,

    pub postal_code: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Number of parking spots
    pub total_capacity: i32,

    /// Spots currently free
    pub available_spots: i32,

    /// Price per started hour
    pub hourly_rate: Option<Decimal>,

    /// Price per billed day
    pub daily_rate: Option<Decimal>,

    /// Inactive lots accept no new sessions
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ParkingLot {
    /// Snapshot of the lot's pricing configuration
    #[inline]
    pub fn tariff(&self) -> TariffConfig {
        TariffConfig::new(self.hourly_rate, self.daily_rate)
    }

    /// Check the capacity constraints enforced by the store
    pub fn capacity_is_consistent(&self) -> bool {
        self.total_capacity >= 0
            && self.available_spots >= 0
            && self.available_spots <= self.total_capacity
    }
}

impl Default for ParkingLot {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: None,
            latitude: None,
            longitude: None,
            total_capacity: 0,
            available_spots: 0,
            hourly_rate: None,
            daily_rate: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tariff_snapshot() {
        let lot = ParkingLot {
            hourly_rate: Some(dec!(2.50)),
            daily_rate: None,
            ..Default::default()
        };

        let tariff = lot.tariff();
        assert_eq!(tariff.hourly_rate, Some(dec!(2.50)));
        assert_eq!(tariff.effective_daily_rate(), dec!(999));
    }

    #[test]
    fn test_capacity_consistency() {
        let lot = ParkingLot {
            total_capacity: 10,
            available_spots: 4,
            ..Default::default()
        };
        assert!(lot.capacity_is_consistent());

        let lot = ParkingLot {
            total_capacity: 10,
            available_spots: 11,
            ..Default::default()
        };
        assert!(!lot.capacity_is_consistent());
    }
}
