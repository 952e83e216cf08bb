//! Tariff model and price calculator
//!
//! Turns a parking lot's tariff and a session interval into a charge.
//! Billing is per started hour, capped by the daily rate within a single
//! calendar day, and switches to day billing once the session crosses
//! midnight (UTC). Short sessions inside the grace period are free.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::session::SessionInterval;
use crate::{AppError, AppResult};

/// Sessions shorter than this many seconds are not charged
pub const GRACE_PERIOD_SECS: i64 = 180;

/// Daily rate assumed when a parking lot has none configured
///
/// Large enough to never act as a cap, and charged as-is per billed day.
pub const MISSING_DAILY_RATE: Decimal = dec!(999);

/// Hourly rate assumed when a parking lot has none configured
pub const MISSING_HOURLY_RATE: Decimal = Decimal::ZERO;

const SECONDS_PER_HOUR: Decimal = dec!(3600);

/// Sessions up to this many seconds bill zero hours
const ZERO_HOUR_MAX_SECS: Decimal = dec!(1);

/// Pricing view of a parking lot
///
/// A snapshot read of the lot at calculation time; never mutated by the
/// calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Price per started hour (None = 0)
    pub hourly_rate: Option<Decimal>,

    /// Price per billed day, and cap for single-day sessions (None = 999)
    pub daily_rate: Option<Decimal>,
}

/// Result of a price calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    /// Amount in euros, rounded to 2 decimal places
    pub amount: Decimal,

    /// Started hours of the session
    pub billed_hours: i64,

    /// Billed days (0 unless the session crossed midnight)
    pub billed_days: i64,
}

impl Charge {
    /// A zero charge
    pub fn free() -> Self {
        Self {
            amount: Decimal::ZERO,
            billed_hours: 0,
            billed_days: 0,
        }
    }

    /// Amount in cents, as stored on sessions and payments
    pub fn amount_cents(&self) -> i64 {
        (self.amount * dec!(100))
            .round()
            .to_i64()
            .unwrap_or(i64::MAX)
    }
}

impl TariffConfig {
    /// Create a tariff from optional rates
    pub fn new(hourly_rate: Option<Decimal>, daily_rate: Option<Decimal>) -> Self {
        Self {
            hourly_rate,
            daily_rate,
        }
    }

    /// Reject negative rates
    pub fn validate(&self) -> AppResult<()> {
        if let Some(rate) = self.hourly_rate.filter(|r| *r < Decimal::ZERO) {
            return Err(AppError::InvalidTariff(format!(
                "hourly rate must not be negative, got {}",
                rate
            )));
        }

        if let Some(rate) = self.daily_rate.filter(|r| *r < Decimal::ZERO) {
            return Err(AppError::InvalidTariff(format!(
                "daily rate must not be negative, got {}",
                rate
            )));
        }

        Ok(())
    }

    /// Hourly rate with the legacy default applied
    #[inline]
    pub fn effective_hourly_rate(&self) -> Decimal {
        self.hourly_rate.unwrap_or(MISSING_HOURLY_RATE)
    }

    /// Daily rate with the legacy default applied
    #[inline]
    pub fn effective_daily_rate(&self) -> Decimal {
        self.daily_rate.unwrap_or(MISSING_DAILY_RATE)
    }

    /// Calculate the charge for a session, using the current instant for an
    /// open interval
    pub fn calculate_price(&self, interval: &SessionInterval) -> AppResult<Charge> {
        self.calculate_price_at(interval, Utc::now())
    }

    /// Calculate the charge for a session, using `now` for an open interval
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidTariff` if either rate is negative. Checked before
    ///   anything else, so it is reported regardless of the timestamps.
    /// - `AppError::InvalidInterval` if the session stops before it starts.
    pub fn calculate_price_at(
        &self,
        interval: &SessionInterval,
        now: DateTime<Utc>,
    ) -> AppResult<Charge> {
        self.validate()?;

        let start = interval.start;
        let stop = interval.stop_or(now);

        if stop < start {
            return Err(AppError::InvalidInterval(format!(
                "stop {} is before start {}",
                stop, start
            )));
        }

        let elapsed = stop - start;
        let seconds = elapsed_seconds(elapsed);

        let billed_hours = if seconds <= ZERO_HOUR_MAX_SECS {
            0
        } else {
            (seconds / SECONDS_PER_HOUR)
                .ceil()
                .to_i64()
                .ok_or_else(|| AppError::InvalidInterval(format!("{}s is out of range", seconds)))?
        };

        let hourly = self.effective_hourly_rate();
        let daily = self.effective_daily_rate();

        let (amount, billed_days) = if seconds < Decimal::from(GRACE_PERIOD_SECS) {
            (Decimal::ZERO, 0)
        } else if stop.date_naive() > start.date_naive() {
            let days = elapsed.num_days() + 1;
            (daily * Decimal::from(days), days)
        } else {
            ((hourly * Decimal::from(billed_hours)).min(daily), 0)
        };

        let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

        debug!(
            "Priced {}s at {}/h, {}/day: {} ({}h, {}d)",
            seconds, hourly, daily, amount, billed_hours, billed_days
        );

        Ok(Charge {
            amount,
            billed_hours,
            billed_days,
        })
    }
}

/// Elapsed time in seconds with microsecond precision
fn elapsed_seconds(elapsed: Duration) -> Decimal {
    match elapsed.num_microseconds() {
        Some(micros) => Decimal::new(micros, 6),
        None => Decimal::from(elapsed.num_seconds()),
    }
}
