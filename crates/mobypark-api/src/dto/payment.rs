//! Payment DTOs

use chrono::{DateTime, Utc};
use mobypark_core::models::PaymentRecord;
use mobypark_services::NewPayment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentCreateRequest {
    #[validate(range(min = 1))]
    pub session_id: i32,

    /// User paying for the session
    #[validate(range(min = 1))]
    pub initiator_user_id: i32,

    #[validate(length(max = 50))]
    pub method: Option<String>,

    #[validate(length(max = 100))]
    pub issuer: Option<String>,

    #[validate(length(max = 100))]
    pub bank: Option<String>,
}

impl From<PaymentCreateRequest> for NewPayment {
    fn from(req: PaymentCreateRequest) -> Self {
        Self {
            session_id: req.session_id,
            initiator_user_id: req.initiator_user_id,
            method: req.method,
            issuer: req.issuer,
            bank: req.bank,
        }
    }
}

/// Payment completion request
///
/// Identifies the caller, as forwarded by the gateway.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentCompleteRequest {
    #[validate(range(min = 1))]
    pub user_id: i32,
}

/// Payment response
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: i32,

    /// Amount in euros
    pub amount: Decimal,

    pub session_id: Option<i32>,
    pub initiator_user_id: i32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub hash: Option<String>,
    pub method: Option<String>,
    pub issuer: Option<String>,
    pub bank: Option<String>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            amount: payment.amount(),
            id: payment.id,
            session_id: payment.session_id,
            initiator_user_id: payment.initiator_user_id,
            created_at: payment.created_at,
            completed_at: payment.completed_at,
            hash: payment.hash,
            method: payment.method,
            issuer: payment.issuer,
            bank: payment.bank,
        }
    }
}
