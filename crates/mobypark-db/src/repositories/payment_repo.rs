//! Payment ledger implementation
//!
//! Payments are append-only apart from `completed_at`, which is set once.
//! Amounts are summed in the database and returned in cents; a sum over no
//! rows is zero.

use mobypark_core::{models::PaymentRecord, traits::PaymentLedger, AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

/// PostgreSQL implementation of PaymentLedger
pub struct PgPaymentLedger {
    pool: PgPool,
}

impl PgPaymentLedger {
    /// Create a new payment ledger
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentLedger for PgPaymentLedger {
    #[instrument(skip(self))]
    async fn sum_amount_by_session(&self, session_id: i32) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error summing payments of session {}: {}", session_id, e);
            AppError::Database(format!("Failed to sum payments: {}", e))
        })?;

        debug!("Session {} has {} cents paid", session_id, result.0);
        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn sum_amount_by_hash(&self, hash: &str) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments WHERE hash = $1",
        )
        .bind(hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error summing payments by hash: {}", e);
            AppError::Database(format!("Failed to sum payments: {}", e))
        })?;

        debug!("Hash {} has {} cents paid", hash, result.0);
        Ok(result.0)
    }

    #[instrument(skip(self, payment))]
    async fn create(&self, payment: &PaymentRecord) -> AppResult<PaymentRecord> {
        debug!(
            "Recording payment of {} cents for session {:?}",
            payment.amount_cents, payment.session_id
        );

        let row = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            INSERT INTO payments (
                amount_cents, session_id, initiator_user_id,
                completed_at, hash, method, issuer, bank
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id, amount_cents, session_id, initiator_user_id,
                created_at, completed_at, hash, method, issuer, bank
            "#,
        )
        .bind(payment.amount_cents)
        .bind(payment.session_id)
        .bind(payment.initiator_user_id)
        .bind(payment.completed_at)
        .bind(&payment.hash)
        .bind(&payment.method)
        .bind(&payment.issuer)
        .bind(&payment.bank)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating payment: {}", e);
            AppError::Database(format!("Failed to create payment: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list_by_session(&self, session_id: i32) -> AppResult<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            SELECT
                id, amount_cents, session_id, initiator_user_id,
                created_at, completed_at, hash, method, issuer, bank
            FROM payments
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing payments of session {}: {}", session_id, e);
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, payment_id: i32) -> AppResult<Option<PaymentRecord>> {
        let row = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            SELECT
                id, amount_cents, session_id, initiator_user_id,
                created_at, completed_at, hash, method, issuer, bank
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching payment {}: {}", payment_id, e);
            AppError::Database(format!("Failed to fetch payment: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_by_initiator(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            SELECT
                id, amount_cents, session_id, initiator_user_id,
                created_at, completed_at, hash, method, issuer, bank
            FROM payments
            WHERE initiator_user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing payments of user {}: {}", user_id, e);
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn complete(
        &self,
        payment_id: i32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<Option<PaymentRecord>> {
        let row = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            UPDATE payments
            SET completed_at = $2
            WHERE id = $1 AND completed_at IS NULL
            RETURNING
                id, amount_cents, session_id, initiator_user_id,
                created_at, completed_at, hash, method, issuer, bank
            "#,
        )
        .bind(payment_id)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error completing payment {}: {}", payment_id, e);
            AppError::Database(format!("Failed to complete payment: {}", e))
        })?;

        if row.is_none() {
            warn!("Payment {} was not pending", payment_id);
        }

        Ok(row.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    amount_cents: i64,
    session_id: Option<i32>,
    initiator_user_id: i32,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    hash: Option<String>,
    method: Option<String>,
    issuer: Option<String>,
    bank: Option<String>,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            amount_cents: row.amount_cents,
            session_id: row.session_id,
            initiator_user_id: row.initiator_user_id,
            created_at: row.created_at,
            completed_at: row.completed_at,
            hash: row.hash,
            method: row.method,
            issuer: row.issuer,
            bank: row.bank,
        }
    }
}
