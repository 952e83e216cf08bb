//! Pricing service implementation
//!
//! Looks up a lot's tariff and runs the price calculator against it. The
//! tariff is read on every call, never cached, so a session is priced with
//! the rates in force when it is priced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mobypark_core::{
    models::{Charge, ParkingSession, TariffConfig},
    traits::{ParkingLotRepository, PricingService},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Pricing service backed by the parking lot repository
pub struct PricingServiceImpl<P: ParkingLotRepository> {
    lot_repo: Arc<P>,
}

impl<P: ParkingLotRepository> PricingServiceImpl<P> {
    /// Create a new pricing service
    pub fn new(lot_repo: Arc<P>) -> Self {
        Self { lot_repo }
    }
}

#[async_trait]
impl<P: ParkingLotRepository> PricingService for PricingServiceImpl<P> {
    #[instrument(skip(self))]
    async fn tariff_for(&self, parking_lot_id: i32) -> AppResult<TariffConfig> {
        self.lot_repo
            .find_tariff(parking_lot_id)
            .await?
            .ok_or_else(|| AppError::ParkingLotNotFound(parking_lot_id.to_string()))
    }

    #[instrument(skip(self, session), fields(session_id = session.id))]
    async fn price_session(
        &self,
        parking_lot_id: i32,
        session: &ParkingSession,
        now: DateTime<Utc>,
    ) -> AppResult<Charge> {
        let tariff = self.tariff_for(parking_lot_id).await?;

        let charge = tariff
            .calculate_price_at(&session.interval(), now)
            .map_err(|e| {
                error!(
                    "Failed to price session {} at lot {}: {}",
                    session.id, parking_lot_id, e
                );
                e
            })?;

        debug!(
            "Session {} at lot {} costs {}",
            session.id, parking_lot_id, charge.amount
        );

        Ok(charge)
    }
}
