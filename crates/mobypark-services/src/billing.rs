//! Billing service implementation
//!
//! Builds a user's billing summary: every session of the user's vehicles is
//! priced against its lot's current tariff and compared with what has been
//! paid for it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mobypark_core::{
    models::{BillingSummary, PaymentRecord},
    traits::{BillingService, SessionRepository, SettlementService},
    AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Billing service over sessions and settled payments
pub struct BillingServiceImpl<S: SessionRepository, T: SettlementService> {
    session_repo: Arc<S>,
    settlement: Arc<T>,
}

impl<S: SessionRepository, T: SettlementService> BillingServiceImpl<S, T> {
    /// Create a new billing service
    pub fn new(session_repo: Arc<S>, settlement: Arc<T>) -> Self {
        Self {
            session_repo,
            settlement,
        }
    }

    /// Summary with running sessions priced up to `now`
    ///
    /// A tariff error on any session aborts the whole summary.
    #[instrument(skip(self))]
    pub async fn summary_for_user_at(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<BillingSummary> {
        let sessions = self.session_repo.list_billable_by_user(user_id).await?;

        let mut amount = Decimal::ZERO;
        let mut paid = Decimal::ZERO;

        for billable in &sessions {
            let session = &billable.session;
            let charge = billable.tariff.calculate_price_at(&session.interval(), now)?;

            let legacy_key = PaymentRecord::legacy_hash(session.id, &billable.license_plate);
            let session_paid = self.settlement.sum_paid(session.id, &legacy_key).await?;

            debug!(
                "Session {}: charged {}, paid {}",
                session.id, charge.amount, session_paid
            );

            amount += charge.amount;
            paid += session_paid;
        }

        let summary = BillingSummary::from_totals(amount, paid, sessions.len() as i64);

        info!(
            "Billing for user {}: {} sessions, amount {}, paid {}",
            user_id, summary.sessions, summary.amount, summary.paid
        );

        Ok(summary)
    }
}

#[async_trait]
impl<S: SessionRepository, T: SettlementService> BillingService for BillingServiceImpl<S, T> {
    async fn summary_for_user(&self, user_id: i32) -> AppResult<BillingSummary> {
        self.summary_for_user_at(user_id, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{at, paid_for_hash, paid_for_session, MockLedger, MockSessions};
    use crate::settlement::SettlementReconciler;
    use mobypark_core::{
        models::{BillableSession, ParkingSession, TariffConfig},
        AppError,
    };
    use rust_decimal_macros::dec;

    type TestBilling = BillingServiceImpl<MockSessions, SettlementReconciler<MockLedger>>;

    fn billing(sessions: MockSessions, ledger: MockLedger) -> TestBilling {
        BillingServiceImpl::new(
            Arc::new(sessions),
            Arc::new(SettlementReconciler::new(Arc::new(ledger))),
        )
    }

    fn billable(
        id: i32,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        tariff: TariffConfig,
        plate: &str,
    ) -> BillableSession {
        let mut session = ParkingSession::start(1, 1, plate, start);
        session.id = id;
        session.stop_date = Some(stop);
        BillableSession {
            session,
            tariff,
            license_plate: plate.to_string(),
        }
    }

    #[tokio::test]
    async fn test_summary_combines_charges_and_payments() {
        let tariff = TariffConfig::new(Some(dec!(5)), Some(dec!(20)));
        let sessions = MockSessions::default();
        // 2 hours, 10.00
        sessions.bill_to(
            7,
            billable(1, at(2025, 5, 22, 8, 0, 0), at(2025, 5, 22, 10, 0, 0), tariff, "AAA-AAA-222"),
        );
        // capped at the daily rate, 20.00
        sessions.bill_to(
            7,
            billable(2, at(2025, 5, 22, 8, 0, 0), at(2025, 5, 22, 16, 0, 0), tariff, "AAA-AAA-222"),
        );
        // crosses midnight, one day, 20.00
        sessions.bill_to(
            7,
            billable(3, at(2025, 5, 22, 23, 0, 0), at(2025, 5, 23, 1, 0, 0), tariff, "AAA-AAA-222"),
        );
        sessions.bill_to(
            8,
            billable(4, at(2025, 5, 22, 8, 0, 0), at(2025, 5, 22, 9, 0, 0), tariff, "ZZ-99-ZZ"),
        );

        let ledger = MockLedger::with(vec![
            paid_for_session(1, 1000),
            paid_for_hash(&PaymentRecord::legacy_hash(2, "AAA-AAA-222"), 1000),
            paid_for_session(4, 500),
        ]);

        let summary = billing(sessions, ledger)
            .summary_for_user_at(7, at(2025, 6, 1, 0, 0, 0))
            .await
            .unwrap();

        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.amount, dec!(50.00));
        assert_eq!(summary.paid, dec!(20.00));
        assert_eq!(summary.balance, dec!(30.00));
        assert_eq!(summary.average, dec!(16.67));
    }

    #[tokio::test]
    async fn test_user_without_sessions() {
        let summary = billing(MockSessions::default(), MockLedger::default())
            .summary_for_user(42)
            .await
            .unwrap();

        assert_eq!(summary, BillingSummary::default());
    }

    #[tokio::test]
    async fn test_running_session_priced_until_now() {
        let sessions = MockSessions::default();
        let mut running = billable(
            1,
            at(2025, 5, 22, 8, 0, 0),
            at(2025, 5, 22, 8, 0, 0),
            TariffConfig::new(Some(dec!(1.25)), Some(dec!(10))),
            "AB-12-CD",
        );
        running.session.stop_date = None;
        sessions.bill_to(1, running);

        let summary = billing(sessions, MockLedger::default())
            .summary_for_user_at(1, at(2025, 5, 22, 9, 30, 0))
            .await
            .unwrap();

        assert_eq!(summary.amount, dec!(2.50));
        assert_eq!(summary.balance, dec!(2.50));
    }

    #[tokio::test]
    async fn test_invalid_tariff_aborts_summary() {
        let sessions = MockSessions::default();
        sessions.bill_to(
            1,
            billable(
                1,
                at(2025, 5, 22, 8, 0, 0),
                at(2025, 5, 22, 9, 0, 0),
                TariffConfig::new(Some(dec!(2)), Some(dec!(20))),
                "AB-12-CD",
            ),
        );
        sessions.bill_to(
            1,
            billable(
                2,
                at(2025, 5, 22, 8, 0, 0),
                at(2025, 5, 22, 9, 0, 0),
                TariffConfig::new(Some(dec!(-1)), None),
                "AB-12-CD",
            ),
        );

        let result = billing(sessions, MockLedger::default())
            .summary_for_user(1)
            .await;

        assert!(matches!(result, Err(AppError::InvalidTariff(_))));
    }

    #[tokio::test]
    async fn test_ledger_failure_aborts_summary() {
        let sessions = MockSessions::default();
        sessions.bill_to(
            1,
            billable(
                1,
                at(2025, 5, 22, 8, 0, 0),
                at(2025, 5, 22, 9, 0, 0),
                TariffConfig::default(),
                "AB-12-CD",
            ),
        );

        let result = billing(sessions, MockLedger::failing())
            .summary_for_user(1)
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
