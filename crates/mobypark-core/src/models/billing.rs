//! Billing summary model

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{session::ParkingSession, tariff::TariffConfig};

/// A session together with what is needed to bill it
#[derive(Debug, Clone)]
pub struct BillableSession {
    pub session: ParkingSession,

    /// Tariff of the session's parking lot
    pub tariff: TariffConfig,

    /// Plate of the session's vehicle, as entered
    pub license_plate: String,
}

/// Charged versus paid totals over a user's sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BillingSummary {
    /// Total charged
    pub amount: Decimal,

    /// Total paid
    pub paid: Decimal,

    /// Charged minus paid
    pub balance: Decimal,

    /// Number of sessions
    pub sessions: i64,

    /// Average charge per session (0 without sessions)
    pub average: Decimal,
}

impl BillingSummary {
    /// Build a summary from raw totals, rounding every figure to cents
    pub fn from_totals(amount: Decimal, paid: Decimal, sessions: i64) -> Self {
        let amount = round_cents(amount);
        let paid = round_cents(paid);
        let average = if sessions > 0 {
            round_cents(amount / Decimal::from(sessions))
        } else {
            Decimal::ZERO
        };

        Self {
            amount,
            paid,
            balance: round_cents(amount - paid),
            sessions,
            average,
        }
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
