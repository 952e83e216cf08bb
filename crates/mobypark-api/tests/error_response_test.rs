//! HTTP rendering of application errors

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use mobypark_core::AppError;
use rust_decimal_macros::dec;
use serde_json::Value;

async fn failing(kind: web::Path<String>) -> Result<HttpResponse, AppError> {
    match kind.as_str() {
        "tariff" => {
            let tariff = mobypark_core::models::TariffConfig::new(Some(dec!(20)), Some(dec!(-20)));
            tariff.validate()?;
            Ok(HttpResponse::Ok().finish())
        }
        "inactive" => Err(AppError::ParkingLotInactive("3".to_string())),
        "duplicate" => Err(AppError::AlreadyExists("AB-12-CD".to_string())),
        "foreign-payment" => Err(AppError::Forbidden("payment 4".to_string())),
        "paid-twice" => Err(AppError::PaymentAlreadyCompleted("4".to_string())),
        "running" => Err(AppError::SessionStillActive("9".to_string())),
        _ => Err(AppError::SessionNotFound(kind.into_inner())),
    }
}

async fn call(kind: &str) -> (StatusCode, Value) {
    let app = test::init_service(App::new().route("/{kind}", web::get().to(failing))).await;
    let req = test::TestRequest::get().uri(&format!("/{}", kind)).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_rt::test]
async fn test_invalid_tariff_is_bad_request() {
    let (status, body) = call("tariff").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_tariff");
    assert_eq!(body["status"], 400);
}

#[actix_rt::test]
async fn test_inactive_lot_is_conflict() {
    let (status, body) = call("inactive").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "parking_lot_inactive");
}

#[actix_rt::test]
async fn test_duplicate_vehicle_is_conflict() {
    let (status, _) = call("duplicate").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_missing_session_is_not_found() {
    let (status, body) = call("42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session_not_found");
    assert!(body["message"].as_str().unwrap().contains("42"));
}

#[actix_rt::test]
async fn test_payment_completion_errors() {
    let (status, body) = call("foreign-payment").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = call("paid-twice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "payment_already_completed");
}

#[actix_rt::test]
async fn test_paying_running_session_is_conflict() {
    let (status, body) = call("running").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "session_active");
}
