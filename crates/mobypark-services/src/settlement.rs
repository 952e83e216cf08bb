//! Settlement reconciler
//!
//! Determines how much has been paid for a session. Payments are looked up
//! by session id first; payments recorded before session ids were stored
//! can only be found through the legacy hash of the session.

use async_trait::async_trait;
use mobypark_core::{traits::PaymentLedger, traits::SettlementService, AppResult};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Reconciles recorded payments against sessions
pub struct SettlementReconciler<L: PaymentLedger> {
    ledger: Arc<L>,
}

impl<L: PaymentLedger> SettlementReconciler<L> {
    /// Create a new reconciler
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl<L: PaymentLedger> SettlementService for SettlementReconciler<L> {
    /// Sum of payments for a session in euros
    ///
    /// The legacy key is only consulted when nothing is recorded under the
    /// session id. A session refunded back to exactly zero therefore also
    /// falls back to the legacy key.
    #[instrument(skip(self))]
    async fn sum_paid(&self, session_id: i32, legacy_key: &str) -> AppResult<Decimal> {
        let cents = self.ledger.sum_amount_by_session(session_id).await?;
        if cents != 0 {
            return Ok(Decimal::new(cents, 2));
        }

        let cents = self.ledger.sum_amount_by_hash(legacy_key).await?;
        if cents != 0 {
            debug!("Session {} settled through legacy key", session_id);
        }

        Ok(Decimal::new(cents, 2))
    }
}
