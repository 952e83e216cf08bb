//! Payment service
//!
//! Records payments for stopped sessions. Each payment carries the session's
//! stored cost and the legacy hash of the session, so it can be settled
//! through either key. Payments are created pending and completed later by
//! the user who initiated them.

use chrono::{DateTime, Utc};
use mobypark_core::{
    models::PaymentRecord,
    traits::{PaymentLedger, SessionRepository, VehicleRepository},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Payment to record for a session
#[derive(Debug, Clone, Default)]
pub struct NewPayment {
    pub session_id: i32,
    pub initiator_user_id: i32,
    pub method: Option<String>,
    pub issuer: Option<String>,
    pub bank: Option<String>,
}

/// Payment service
pub struct PaymentService<S, V, L>
where
    S: SessionRepository,
    V: VehicleRepository,
    L: PaymentLedger,
{
    session_repo: Arc<S>,
    vehicle_repo: Arc<V>,
    ledger: Arc<L>,
}

impl<S, V, L> PaymentService<S, V, L>
where
    S: SessionRepository,
    V: VehicleRepository,
    L: PaymentLedger,
{
    /// Create a new payment service
    pub fn new(session_repo: Arc<S>, vehicle_repo: Arc<V>, ledger: Arc<L>) -> Self {
        Self {
            session_repo,
            vehicle_repo,
            ledger,
        }
    }

    /// Record a payment of a session's cost
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    /// - `SessionStillActive` if the session has not been stopped yet
    /// - `VehicleNotFound` if the session's vehicle is gone
    #[instrument(skip(self, request), fields(session_id = request.session_id))]
    pub async fn create_payment(&self, request: NewPayment) -> AppResult<PaymentRecord> {
        let session = self
            .session_repo
            .find_by_id(request.session_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound(request.session_id.to_string()))?;

        if session.stop_date.is_none() {
            warn!("Rejected payment for running session {}", session.id);
            return Err(AppError::SessionStillActive(session.id.to_string()));
        }

        let vehicle_id = session.vehicle_id.ok_or_else(|| {
            AppError::VehicleNotFound(format!("session {} has no vehicle", session.id))
        })?;

        let vehicle = self
            .vehicle_repo
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::VehicleNotFound(vehicle_id.to_string()))?;

        let payment = PaymentRecord {
            id: 0,
            amount_cents: session.cost_cents,
            session_id: Some(session.id),
            initiator_user_id: request.initiator_user_id,
            created_at: Utc::now(),
            completed_at: None,
            hash: Some(PaymentRecord::legacy_hash(session.id, &vehicle.license_plate)),
            method: request.method,
            issuer: request.issuer,
            bank: request.bank,
        };

        let payment = self.ledger.create(&payment).await?;

        info!(
            "Recorded payment {} of {} for session {}",
            payment.id,
            payment.amount(),
            session.id
        );

        Ok(payment)
    }

    /// Payments recorded against a session
    pub async fn list_for_session(&self, session_id: i32) -> AppResult<Vec<PaymentRecord>> {
        self.ledger.list_by_session(session_id).await
    }

    /// Payments initiated by a user, most recent first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<PaymentRecord>> {
        self.ledger.list_by_initiator(user_id, limit, offset).await
    }

    /// Mark a pending payment as completed
    pub async fn complete_payment(&self, payment_id: i32, user_id: i32) -> AppResult<PaymentRecord> {
        self.complete_payment_at(payment_id, user_id, Utc::now())
            .await
    }

    /// Mark a pending payment as completed at `now`
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment does not exist
    /// - `Forbidden` if `user_id` did not initiate the payment
    /// - `PaymentAlreadyCompleted` if it was completed before
    #[instrument(skip(self))]
    pub async fn complete_payment_at(
        &self,
        payment_id: i32,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<PaymentRecord> {
        let payment = self
            .ledger
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::PaymentNotFound(payment_id.to_string()))?;

        if payment.initiator_user_id != user_id {
            warn!(
                "User {} may not complete payment {} of user {}",
                user_id, payment_id, payment.initiator_user_id
            );
            return Err(AppError::Forbidden(format!(
                "payment {} was initiated by another user",
                payment_id
            )));
        }

        if payment.is_completed() {
            return Err(AppError::PaymentAlreadyCompleted(payment_id.to_string()));
        }

        let payment = self
            .ledger
            .complete(payment_id, now)
            .await?
            .ok_or_else(|| AppError::PaymentAlreadyCompleted(payment_id.to_string()))?;

        info!("Completed payment {} by user {}", payment_id, user_id);

        Ok(payment)
    }
}
