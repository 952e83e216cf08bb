//! Payment model
//!
//! Payments are append-only ledger entries stored in cents. Several entries
//! may exist for one session (partial payments). Entries recorded before
//! session ids were tracked are only reachable through their legacy hash.

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier
    pub id: i32,

    /// Amount in cents
    pub amount_cents: i64,

    /// Session paid for (None for legacy rows imported without one)
    pub session_id: Option<i32>,

    /// User who initiated the payment
    pub initiator_user_id: i32,

    pub created_at: DateTime<Utc>,

    pub completed_at: Option<DateTime<Utc>>,

    /// Legacy payment key, see [`PaymentRecord::legacy_hash`]
    pub hash: Option<String>,

    pub method: Option<String>,

    pub issuer: Option<String>,

    pub bank: Option<String>,
}

impl PaymentRecord {
    /// Legacy payment key of a session
    ///
    /// MD5 of the decimal session id followed by the license plate, as
    /// lowercase hex. The plate is hashed exactly as given: it is not
    /// cleaned, so `" AB-12 "` and `"AB-12"` produce different keys.
    pub fn legacy_hash(session_id: i32, license_plate: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(session_id.to_string().as_bytes());
        hasher.update(license_plate.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Amount in euros
    #[inline]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.amount_cents, 2)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl Default for PaymentRecord {
    fn default() -> Self {
        Self {
            id: 0,
            amount_cents: 0,
            session_id: None,
            initiator_user_id: 0,
            created_at: Utc::now(),
            completed_at: None,
            hash: None,
            method: None,
            issuer: None,
            bank: None,
        }
    }
}
