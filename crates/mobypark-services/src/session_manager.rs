//! Session manager service
//!
//! Manages parking sessions through their lifecycle:
//! - Start a session for a registered vehicle at an active lot
//! - Stop a running session, pricing it against the lot's tariff
//! - Report the charge of a session so far

use chrono::{DateTime, Utc};
use mobypark_core::{
    models::{Charge, ParkingSession},
    traits::{ParkingLotRepository, PricingService, SessionRepository, VehicleRepository},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::pricing::PricingServiceImpl;

/// Session manager
pub struct SessionManager<P, S, V>
where
    P: ParkingLotRepository,
    S: SessionRepository,
    V: VehicleRepository,
{
    lot_repo: Arc<P>,
    session_repo: Arc<S>,
    vehicle_repo: Arc<V>,
    pricing: PricingServiceImpl<P>,
}

impl<P, S, V> SessionManager<P, S, V>
where
    P: ParkingLotRepository,
    S: SessionRepository,
    V: VehicleRepository,
{
    /// Create a new session manager
    pub fn new(lot_repo: Arc<P>, session_repo: Arc<S>, vehicle_repo: Arc<V>) -> Self {
        Self {
            pricing: PricingServiceImpl::new(Arc::clone(&lot_repo)),
            lot_repo,
            session_repo,
            vehicle_repo,
        }
    }

    /// Start a session for a vehicle at a parking lot
    ///
    /// # Errors
    ///
    /// - `ParkingLotNotFound` / `VehicleNotFound` if either does not exist
    /// - `ParkingLotInactive` if the lot is closed
    pub async fn start_session(
        &self,
        parking_lot_id: i32,
        vehicle_id: i32,
    ) -> AppResult<ParkingSession> {
        self.start_session_at(parking_lot_id, vehicle_id, Utc::now())
            .await
    }

    #[instrument(skip(self))]
    pub async fn start_session_at(
        &self,
        parking_lot_id: i32,
        vehicle_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<ParkingSession> {
        let lot = self
            .lot_repo
            .find_by_id(parking_lot_id)
            .await?
            .ok_or_else(|| AppError::ParkingLotNotFound(parking_lot_id.to_string()))?;

        if !lot.is_active {
            warn!("Rejected session start at inactive lot {}", parking_lot_id);
            return Err(AppError::ParkingLotInactive(parking_lot_id.to_string()));
        }

        let vehicle = self
            .vehicle_repo
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::VehicleNotFound(vehicle_id.to_string()))?;

        let session = ParkingSession::start(lot.id, vehicle.id, vehicle.license_plate, now);
        let session = self.session_repo.create(&session).await?;

        info!(
            "Started session {} for {} at lot {}",
            session.id, session.license_plate, parking_lot_id
        );

        Ok(session)
    }

    /// Stop a running session and store its charge
    pub async fn stop_session(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> AppResult<ParkingSession> {
        self.stop_session_at(parking_lot_id, session_id, Utc::now())
            .await
    }

    /// Stop a running session at `now`
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the lot has no running session with that id
    /// - `InvalidTariff` if the lot's tariff has a negative rate
    /// - `Conflict` if the session was stopped concurrently
    #[instrument(skip(self))]
    pub async fn stop_session_at(
        &self,
        parking_lot_id: i32,
        session_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<ParkingSession> {
        let mut session = self
            .session_repo
            .find_active(parking_lot_id, session_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        let charge = self
            .pricing
            .price_session(parking_lot_id, &session, now)
            .await?;

        session.complete(now, &charge);

        let session = self
            .session_repo
            .record_charge(&session)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("Session {} already stopped", session_id)))?;

        info!(
            "Stopped session {} at lot {}: {} ({}h, {}d)",
            session_id, parking_lot_id, charge.amount, charge.billed_hours, charge.billed_days
        );

        Ok(session)
    }

    /// Charge of a session so far
    pub async fn running_charge(&self, parking_lot_id: i32, session_id: i32) -> AppResult<Charge> {
        self.running_charge_at(parking_lot_id, session_id, Utc::now())
            .await
    }

    #[instrument(skip(self))]
    pub async fn running_charge_at(
        &self,
        parking_lot_id: i32,
        session_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Charge> {
        let session = self.get_session(parking_lot_id, session_id).await?;
        self.pricing.price_session(parking_lot_id, &session, now).await
    }

    /// Get a session of a lot
    pub async fn get_session(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> AppResult<ParkingSession> {
        self.session_repo
            .find_in_lot(parking_lot_id, session_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))
    }

    /// List the sessions of a lot, most recent first
    pub async fn list_sessions(
        &self,
        parking_lot_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ParkingSession>> {
        self.session_repo
            .list_by_lot(parking_lot_id, limit, offset)
            .await
    }

    /// Delete a session of a lot
    #[instrument(skip(self))]
    pub async fn delete_session(&self, parking_lot_id: i32, session_id: i32) -> AppResult<()> {
        if !self.session_repo.delete(parking_lot_id, session_id).await? {
            return Err(AppError::SessionNotFound(session_id.to_string()));
        }

        info!("Deleted session {} of lot {}", session_id, parking_lot_id);
        Ok(())
    }
}
