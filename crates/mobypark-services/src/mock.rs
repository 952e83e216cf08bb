//! In-memory repositories for service tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mobypark_core::{
    models::{BillableSession, ParkingLot, ParkingSession, PaymentRecord, TariffConfig, Vehicle},
    traits::{
        ParkingLotRepository, PaymentLedger, Repository, SessionRepository, VehicleRepository,
    },
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn lot(id: i32, hourly: Option<Decimal>, daily: Option<Decimal>) -> ParkingLot {
    ParkingLot {
        id,
        name: format!("Lot {}", id),
        total_capacity: 10,
        available_spots: 10,
        hourly_rate: hourly,
        daily_rate: daily,
        ..ParkingLot::default()
    }
}

pub fn vehicle(id: i32, user_id: i32, plate: &str) -> Vehicle {
    Vehicle {
        id,
        ..Vehicle::new(user_id, plate)
    }
}

#[derive(Default)]
pub struct MockParkingLots {
    lots: Mutex<Vec<ParkingLot>>,
}

impl MockParkingLots {
    pub fn with(lots: Vec<ParkingLot>) -> Self {
        Self {
            lots: Mutex::new(lots),
        }
    }

    pub fn set_tariff(&self, id: i32, tariff: TariffConfig) {
        let mut lots = self.lots.lock().unwrap();
        if let Some(lot) = lots.iter_mut().find(|l| l.id == id) {
            lot.hourly_rate = tariff.hourly_rate;
            lot.daily_rate = tariff.daily_rate;
        }
    }
}

#[async_trait]
impl Repository<ParkingLot, i32> for MockParkingLots {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<ParkingLot>> {
        Ok(self.lots.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<ParkingLot>> {
        Ok(self.lots.lock().unwrap().clone())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.lots.lock().unwrap().len() as i64)
    }

    async fn create(&self, entity: &ParkingLot) -> AppResult<ParkingLot> {
        let mut lots = self.lots.lock().unwrap();
        let lot = ParkingLot {
            id: lots.len() as i32 + 1,
            ..entity.clone()
        };
        lots.push(lot.clone());
        Ok(lot)
    }

    async fn update(&self, entity: &ParkingLot) -> AppResult<ParkingLot> {
        Ok(entity.clone())
    }

    async fn delete(&self, _id: i32) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl ParkingLotRepository for MockParkingLots {
    async fn find_tariff(&self, parking_lot_id: i32) -> AppResult<Option<TariffConfig>> {
        Ok(self
            .lots
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == parking_lot_id)
            .map(ParkingLot::tariff))
    }
}

#[derive(Default)]
pub struct MockVehicles {
    vehicles: Mutex<Vec<Vehicle>>,
}

impl MockVehicles {
    pub fn with(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: Mutex::new(vehicles),
        }
    }
}

#[async_trait]
impl Repository<Vehicle, i32> for MockVehicles {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Vehicle>> {
        Ok(self.vehicles.lock().unwrap().clone())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.vehicles.lock().unwrap().len() as i64)
    }

    async fn create(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.lock().unwrap();
        let vehicle = Vehicle {
            id: vehicles.len() as i32 + 1,
            ..entity.clone()
        };
        vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, entity: &Vehicle) -> AppResult<Vehicle> {
        Ok(entity.clone())
    }

    async fn delete(&self, _id: i32) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl VehicleRepository for MockVehicles {
    async fn find_by_clean_plate(&self, plate_clean: &str) -> AppResult<Option<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.license_plate_clean == plate_clean)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i32, _limit: i64, _offset: i64) -> AppResult<Vec<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MockSessions {
    sessions: Mutex<Vec<ParkingSession>>,
    billable: Mutex<Vec<(i32, BillableSession)>>,
}

impl MockSessions {
    pub fn with(sessions: Vec<ParkingSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            billable: Mutex::default(),
        }
    }

    /// Register a session as billable to a user
    pub fn bill_to(&self, user_id: i32, billable: BillableSession) {
        self.billable.lock().unwrap().push((user_id, billable));
    }

    pub fn get(&self, id: i32) -> Option<ParkingSession> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }
}

#[async_trait]
impl SessionRepository for MockSessions {
    async fn find_in_lot(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> AppResult<Option<ParkingSession>> {
        Ok(self
            .get(session_id)
            .filter(|s| s.parking_lot_id == parking_lot_id))
    }

    async fn find_active(
        &self,
        parking_lot_id: i32,
        session_id: i32,
    ) -> AppResult<Option<ParkingSession>> {
        Ok(self
            .find_in_lot(parking_lot_id, session_id)
            .await?
            .filter(|s| s.stop_date.is_none()))
    }

    async fn find_by_id(&self, session_id: i32) -> AppResult<Option<ParkingSession>> {
        Ok(self.get(session_id))
    }

    async fn create(&self, session: &ParkingSession) -> AppResult<ParkingSession> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = ParkingSession {
            id: sessions.len() as i32 + 1,
            ..session.clone()
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn record_charge(&self, session: &ParkingSession) -> AppResult<Option<ParkingSession>> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions
            .iter_mut()
            .find(|s| s.id == session.id && s.stop_date.is_none())
        {
            Some(stored) => {
                *stored = session.clone();
                Ok(Some(session.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_by_lot(
        &self,
        parking_lot_id: i32,
        _limit: i64,
        _offset: i64,
    ) -> AppResult<Vec<ParkingSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.parking_lot_id == parking_lot_id)
            .cloned()
            .collect())
    }

    async fn list_billable_by_user(&self, user_id: i32) -> AppResult<Vec<BillableSession>> {
        Ok(self
            .billable
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, b)| b.clone())
            .collect())
    }

    async fn delete(&self, _parking_lot_id: i32, _session_id: i32) -> AppResult<bool> {
        Ok(true)
    }
}

#[derive(Default)]
pub struct MockLedger {
    payments: Mutex<Vec<PaymentRecord>>,
    failing: bool,
    reads: AtomicUsize,
}

impl MockLedger {
    pub fn with(payments: Vec<PaymentRecord>) -> Self {
        Self {
            payments: Mutex::new(payments),
            ..Self::default()
        }
    }

    /// A ledger whose every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> AppResult<()> {
        if self.failing {
            Err(AppError::Database("connection reset by peer".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Payment keyed by session id
pub fn paid_for_session(session_id: i32, cents: i64) -> PaymentRecord {
    PaymentRecord {
        amount_cents: cents,
        session_id: Some(session_id),
        ..PaymentRecord::default()
    }
}

/// Legacy payment keyed only by hash
pub fn paid_for_hash(hash: &str, cents: i64) -> PaymentRecord {
    PaymentRecord {
        amount_cents: cents,
        hash: Some(hash.to_string()),
        ..PaymentRecord::default()
    }
}

#[async_trait]
impl PaymentLedger for MockLedger {
    async fn sum_amount_by_session(&self, session_id: i32) -> AppResult<i64> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.session_id == Some(session_id))
            .map(|p| p.amount_cents)
            .sum())
    }

    async fn sum_amount_by_hash(&self, hash: &str) -> AppResult<i64> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.hash.as_deref() == Some(hash))
            .map(|p| p.amount_cents)
            .sum())
    }

    async fn create(&self, payment: &PaymentRecord) -> AppResult<PaymentRecord> {
        self.check()?;
        let mut payments = self.payments.lock().unwrap();
        let payment = PaymentRecord {
            id: payments.len() as i32 + 1,
            ..payment.clone()
        };
        payments.push(payment.clone());
        Ok(payment)
    }

    async fn list_by_session(&self, session_id: i32) -> AppResult<Vec<PaymentRecord>> {
        self.check()?;
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.session_id == Some(session_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, payment_id: i32) -> AppResult<Option<PaymentRecord>> {
        self.check()?;
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == payment_id)
            .cloned())
    }

    async fn list_by_initiator(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<PaymentRecord>> {
        self.check()?;
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| p.initiator_user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn complete(
        &self,
        payment_id: i32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<Option<PaymentRecord>> {
        self.check()?;
        let mut payments = self.payments.lock().unwrap();
        Ok(payments
            .iter_mut()
            .find(|p| p.id == payment_id && p.completed_at.is_none())
            .map(|p| {
                p.completed_at = Some(completed_at);
                p.clone()
            }))
    }
}
