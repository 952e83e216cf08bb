//! Tests for API request and response types
//!
//! Handlers need a database; these cover the conversions and validation
//! they rely on.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mobypark_api::dto::{
        BillingResponse, ChargeResponse, PaginationParams, ParkingLotCreateRequest,
        ParkingLotUpdateRequest, PaymentCompleteRequest, PaymentCreateRequest, PaymentResponse,
        SessionResponse, SessionStartRequest, VehicleCreateRequest,
    };
    use mobypark_core::models::{BillingSummary, Charge, ParkingSession, PaymentRecord};
    use mobypark_services::NewPayment;
    use rust_decimal_macros::dec;
    use validator::Validate;

    #[test]
    fn test_billing_response_uses_payed_field() {
        let summary = BillingSummary::from_totals(dec!(50.00), dec!(20.00), 3);
        let json = serde_json::to_value(BillingResponse::new(7, summary)).unwrap();

        assert_eq!(json["payed"], 20.0);
        assert_eq!(json["amount"], 50.0);
        assert_eq!(json["balance"], 30.0);
        assert!((json["average"].as_f64().unwrap() - 16.67).abs() < 1e-9);
        assert_eq!(json["sessions"], 3);
        assert!(json.get("paid").is_none());
    }

    #[test]
    fn test_parking_lot_request_validation() {
        let json = serde_json::json!({
            "name": "Centrum",
            "address": "Stationsplein 1",
            "city": "Rotterdam",
            "capacity": 120,
            "hourly_rate": "2.50",
            "daily_rate": "18"
        });
        let req: ParkingLotCreateRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.is_active);

        let lot = req.to_parking_lot();
        assert_eq!(lot.available_spots, 120);
        assert_eq!(lot.tariff().effective_daily_rate(), dec!(18));

        let invalid = ParkingLotCreateRequest {
            name: String::new(),
            latitude: Some(91.0),
            ..req
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_parking_lot_update_keeps_absent_fields() {
        let json = serde_json::json!({
            "name": "Centrum",
            "address": "Stationsplein 1",
            "city": "Rotterdam",
            "capacity": 120,
            "hourly_rate": "2.50"
        });
        let req: ParkingLotCreateRequest = serde_json::from_value(json).unwrap();
        let mut lot = req.to_parking_lot();

        let update = ParkingLotUpdateRequest {
            daily_rate: Some(dec!(12)),
            is_active: Some(false),
            ..ParkingLotUpdateRequest::default()
        };
        update.apply(&mut lot);

        assert_eq!(lot.name, "Centrum");
        assert_eq!(lot.hourly_rate, Some(dec!(2.50)));
        assert_eq!(lot.daily_rate, Some(dec!(12)));
        assert!(!lot.is_active);
    }

    #[test]
    fn test_session_response_reports_cost_in_euros() {
        let start = Utc.with_ymd_and_hms(2025, 5, 22, 10, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2025, 5, 22, 12, 30, 0).unwrap();
        let mut session = ParkingSession::start(1, 3, "AAA-AAA-222", start);
        session.complete(
            stop,
            &Charge {
                amount: dec!(7.50),
                billed_hours: 3,
                billed_days: 0,
            },
        );

        let response = SessionResponse::from(session);
        assert_eq!(response.cost, dec!(7.50));
        assert_eq!(response.duration_minutes, Some(150));
        assert_eq!(response.status, "completed");
    }

    #[test]
    fn test_charge_response() {
        let response = ChargeResponse::new(4, Charge::free());
        assert_eq!(response.session_id, 4);
        assert_eq!(response.amount, dec!(0));
    }

    #[test]
    fn test_session_start_requires_vehicle() {
        assert!(SessionStartRequest { vehicle_id: 0 }.validate().is_err());
        assert!(SessionStartRequest { vehicle_id: 3 }.validate().is_ok());
    }

    #[test]
    fn test_payment_request_conversion() {
        let json = serde_json::json!({
            "session_id": 33,
            "initiator_user_id": 7,
            "method": "ideal",
            "bank": "ING"
        });
        let req: PaymentCreateRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_ok());

        let payment: NewPayment = req.into();
        assert_eq!(payment.session_id, 33);
        assert_eq!(payment.issuer, None);
        assert_eq!(payment.bank.as_deref(), Some("ING"));
    }

    #[test]
    fn test_payment_complete_request_needs_user() {
        let req: PaymentCompleteRequest =
            serde_json::from_value(serde_json::json!({ "user_id": 7 })).unwrap();
        assert!(req.validate().is_ok());
        assert!(PaymentCompleteRequest { user_id: 0 }.validate().is_err());
    }

    #[test]
    fn test_out_of_range_page_is_rejected() {
        let params: PaginationParams =
            serde_json::from_value(serde_json::json!({ "page": i64::MAX, "per_page": 50 }))
                .unwrap();

        assert!(params.validate().is_err());
        assert!(params.offset() >= 0);
    }

    #[test]
    fn test_payment_response_amount() {
        let record = PaymentRecord {
            amount_cents: 1250,
            session_id: Some(2),
            hash: Some(PaymentRecord::legacy_hash(2, "AAA-AAA-222")),
            ..PaymentRecord::default()
        };

        let response = PaymentResponse::from(record);
        assert_eq!(response.amount, dec!(12.50));
        assert_eq!(
            response.hash.as_deref(),
            Some("015b6229e1463bc8268b3ff9b542649c")
        );
    }

    #[test]
    fn test_vehicle_request_cleans_plate() {
        let req = VehicleCreateRequest {
            user_id: 7,
            license_plate: " aaa-aaa-222 ".to_string(),
            make: Some("Volvo".to_string()),
            model: None,
            color: None,
            year: Some(2019),
        };
        assert!(req.validate().is_ok());

        let vehicle = req.to_vehicle();
        assert_eq!(vehicle.license_plate, " aaa-aaa-222 ");
        assert_eq!(vehicle.license_plate_clean, "AAAAAA222");
        assert_eq!(vehicle.make.as_deref(), Some("Volvo"));

        let too_old = VehicleCreateRequest {
            year: Some(1800),
            ..req
        };
        assert!(too_old.validate().is_err());
    }
}
