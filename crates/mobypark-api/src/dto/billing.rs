//! Billing DTOs

use mobypark_core::models::BillingSummary;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Billing summary response
///
/// Figures are plain JSON numbers. The paid total is serialized as `payed`,
/// the field name existing clients read.
#[derive(Debug, Clone, Serialize)]
pub struct BillingResponse {
    pub user_id: i32,
    pub amount: f64,
    #[serde(rename = "payed")]
    pub paid: f64,
    pub balance: f64,
    pub sessions: i64,
    pub average: f64,
}

impl BillingResponse {
    pub fn new(user_id: i32, summary: BillingSummary) -> Self {
        Self {
            user_id,
            amount: summary.amount.to_f64().unwrap_or(0.0),
            paid: summary.paid.to_f64().unwrap_or(0.0),
            balance: summary.balance.to_f64().unwrap_or(0.0),
            sessions: summary.sessions,
            average: summary.average.to_f64().unwrap_or(0.0),
        }
    }
}
