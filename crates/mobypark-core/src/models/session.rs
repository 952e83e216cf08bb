//! Parking session model
//!
//! A session runs from the moment a vehicle starts parking at a lot until it
//! is stopped. The charge computed at stop time is stored on the session.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tariff::Charge;

/// Session status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Vehicle is currently parked
    #[default]
    Active,
    /// Session stopped and priced
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl SessionStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

/// Time bounds of a session, normalized to UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInterval {
    pub start: DateTime<Utc>,

    /// None while the session is still running
    pub stop: Option<DateTime<Utc>>,
}

impl SessionInterval {
    pub fn new(start: DateTime<Utc>, stop: Option<DateTime<Utc>>) -> Self {
        Self { start, stop }
    }

    /// Interval with both ends known, in any timezone
    pub fn closed<S: TimeZone, E: TimeZone>(start: DateTime<S>, stop: DateTime<E>) -> Self {
        Self {
            start: start.with_timezone(&Utc),
            stop: Some(stop.with_timezone(&Utc)),
        }
    }

    /// Interval of a session that is still running
    pub fn open<S: TimeZone>(start: DateTime<S>) -> Self {
        Self {
            start: start.with_timezone(&Utc),
            stop: None,
        }
    }

    /// Interval whose start was stored without timezone; assumed to be UTC
    pub fn from_naive_start(start: NaiveDateTime, stop: Option<DateTime<Utc>>) -> Self {
        Self {
            start: start.and_utc(),
            stop,
        }
    }

    /// Stop instant, or `now` for a running session
    #[inline]
    pub fn stop_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.stop.unwrap_or(now)
    }
}

/// Parking session entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSession {
    /// Unique identifier
    pub id: i32,

    /// Parking lot the session runs at
    pub parking_lot_id: i32,

    /// Vehicle that started the session (None once the vehicle is deleted)
    pub vehicle_id: Option<i32>,

    /// License plate at session start
    pub license_plate: String,

    pub start_date: DateTime<Utc>,

    pub stop_date: Option<DateTime<Utc>>,

    /// Whole minutes parked, set when the session stops
    pub duration_minutes: Option<i64>,

    /// Charge in cents, set when the session stops
    pub cost_cents: i64,

    pub billed_hours: i64,

    pub billed_days: i64,

    pub status: SessionStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ParkingSession {
    /// Create a new running session
    pub fn start(
        parking_lot_id: i32,
        vehicle_id: i32,
        license_plate: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            parking_lot_id,
            vehicle_id: Some(vehicle_id),
            license_plate: license_plate.into(),
            start_date,
            stop_date: None,
            duration_minutes: None,
            cost_cents: 0,
            billed_hours: 0,
            billed_days: 0,
            status: SessionStatus::Active,
            created_at: start_date,
        }
    }

    /// Check if session is still running
    #[inline]
    pub fn is_active(&self) -> bool {
        self.stop_date.is_none() && self.status == SessionStatus::Active
    }

    /// Time bounds for pricing
    #[inline]
    pub fn interval(&self) -> SessionInterval {
        SessionInterval::new(self.start_date, self.stop_date)
    }

    /// Stored cost in euros
    pub fn cost(&self) -> Decimal {
        Decimal::new(self.cost_cents, 2)
    }

    /// Close the session with the charge computed for `stop`
    pub fn complete(&mut self, stop: DateTime<Utc>, charge: &Charge) {
        self.stop_date = Some(stop);
        self.duration_minutes = Some((stop - self.start_date).num_seconds().div_euclid(60));
        self.cost_cents = charge.amount_cents();
        self.billed_hours = charge.billed_hours;
        self.billed_days = charge.billed_days;
        self.status = SessionStatus::Completed;
    }
}

impl Default for ParkingSession {
    fn default() -> Self {
        Self::start(0, 0, String::new(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_parsing() {
        assert_eq!(SessionStatus::from_str("ACTIVE"), Some(SessionStatus::Active));
        assert_eq!(SessionStatus::from_str("Completed"), Some(SessionStatus::Completed));
        assert_eq!(SessionStatus::from_str("cancelled"), None);
        assert_eq!(SessionStatus::from_str("parked"), None);
        assert_eq!(SessionStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_closed_interval_converts_to_utc() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let start = offset.with_ymd_and_hms(2025, 1, 1, 0, 30, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap();

        let interval = SessionInterval::closed(start, stop);
        assert_eq!(
            interval.start,
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap()
        );
        assert_eq!(interval.stop, Some(stop));
    }

    #[test]
    fn test_open_interval_uses_now() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let now = start + Duration::hours(2);

        let interval = SessionInterval::open(start);
        assert_eq!(interval.stop_or(now), now);
    }

    #[test]
    fn test_complete_session() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let mut session = ParkingSession::start(1, 2, "AB-123-C", start);
        assert!(session.is_active());

        let stop = start + Duration::seconds(61 * 60 + 59);
        let charge = Charge {
            amount: dec!(5.00),
            billed_hours: 2,
            billed_days: 0,
        };
        session.complete(stop, &charge);

        assert!(!session.is_active());
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.duration_minutes, Some(61));
        assert_eq!(session.cost_cents, 500);
        assert_eq!(session.cost(), dec!(5.00));
        assert_eq!(session.billed_hours, 2);
        assert_eq!(session.interval().stop, Some(stop));
    }
}
