//! Router tests that never reach the database: authentication, request
//! parsing and validation failures.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use quotedesk_api::{AppState, create_router};
use quotedesk_core::export::CompanyProfile;
use quotedesk_shared::{JwtConfig, JwtService};
use rstest::rstest;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "router-test-secret";

fn app() -> Router {
    let jwt = JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        ..JwtConfig::default()
    });

    create_router(AppState {
        db: Arc::new(DatabaseConnection::default()),
        jwt_service: Arc::new(jwt),
        company: Arc::new(CompanyProfile::default()),
    })
}

fn token() -> String {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        ..JwtConfig::default()
    })
    .generate_access_token(Uuid::new_v4(), "ESTIMATOR")
    .unwrap()
}

fn authed(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/quotations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "missing_token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let foreign = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        ..JwtConfig::default()
    })
    .generate_access_token(Uuid::new_v4(), "ADMIN")
    .unwrap();

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/customers")
                .header(header::AUTHORIZATION, format!("Bearer {foreign}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "invalid_token");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let response = app()
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn test_blank_company_name_is_bad_request() {
    let response = app()
        .oneshot(authed("POST", "/api/v1/customers", r#"{"company_name": "  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "REQUIRED_FIELD");
}

#[tokio::test]
async fn test_invalid_customer_email_is_bad_request() {
    let response = app()
        .oneshot(authed(
            "POST",
            "/api/v1/customers",
            r#"{"company_name": "Emirates Development LLC", "email": "not-an-email"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "INVALID_EMAIL");
}

#[tokio::test]
async fn test_unknown_item_category_filter_is_bad_request() {
    let response = app()
        .oneshot(authed("GET", "/api/v1/items?category=WOOD", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "INVALID_CATEGORY");
}

#[tokio::test]
async fn test_negative_item_rate_is_bad_request() {
    let response = app()
        .oneshot(authed(
            "POST",
            "/api/v1/items",
            r#"{"category": "GLASS", "name": "Glass", "unit": "sqm", "default_rate": "-1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "NEGATIVE_RATE");
}

#[tokio::test]
async fn test_unknown_status_filter_is_bad_request() {
    let response = app()
        .oneshot(authed("GET", "/api/v1/quotations?status=ARCHIVED", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_setting_without_value_is_bad_request() {
    let response = app()
        .oneshot(authed("PATCH", "/api/v1/settings", r#"{"key": "vat_percentage"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Key and value are required");
}

#[tokio::test]
async fn test_malformed_quotation_body_is_bad_request() {
    let response = app()
        .oneshot(authed("POST", "/api/v1/quotations", r#"{"project_name": 42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");
}

#[rstest]
#[case("/api/v1/customers", r#"{"phone": "123"}"#)]
#[case("/api/v1/quotations", r#"{"project_name": "X", "items": []}"#)]
#[case("/api/v1/items", r#"{"category": "GLASS", "name": "Glass", "unit": "sqm", "default_rate": "abc"}"#)]
#[case("/api/v1/customers", r#"{"company_name": "Acme""#)]
#[tokio::test]
async fn test_unreadable_body_is_bad_request(#[case] uri: &str, #[case] body: &str) {
    let response = app().oneshot(authed("POST", uri, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");
}

#[tokio::test]
async fn test_wrong_content_type_keeps_unsupported_media_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/customers")
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"company_name": "Acme"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

fn quotation_body(items: &str, extra: &str) -> String {
    format!(
        r#"{{"customer_id": "{}", "project_name": "Villa Glazing", "items": {items}{extra}}}"#,
        Uuid::new_v4()
    )
}

const ONE_LINE: &str = r#"[{"scope_of_work": "10mm glass", "quantity": "10", "rate": "280.00"}]"#;

#[rstest]
#[case(quotation_body("[]", ""), "NO_LINE_ITEMS")]
#[case(
    quotation_body(r#"[{"scope_of_work": "Glass", "quantity": "-1", "rate": "280.00"}]"#, ""),
    "INVALID_INPUT"
)]
#[case(
    quotation_body(r#"[{"scope_of_work": "  ", "quantity": "1", "rate": "1"}]"#, ""),
    "EMPTY_SCOPE_OF_WORK"
)]
#[case(quotation_body(ONE_LINE, r#", "status": "APPROVED""#), "INVALID_INITIAL_STATUS")]
#[case(quotation_body(ONE_LINE, r#", "status": "PENDING""#), "INVALID_STATUS")]
#[case(quotation_body(ONE_LINE, r#", "vat_percentage": "21""#), "VAT_PERCENTAGE_OUT_OF_RANGE")]
#[case(
    quotation_body(ONE_LINE, &format!(r#", "site_location": "{}""#, "S".repeat(256))),
    "TOO_LONG"
)]
#[tokio::test]
async fn test_invalid_quotation_is_bad_request(#[case] body: String, #[case] code: &str) {
    let response = app()
        .oneshot(authed("POST", "/api/v1/quotations", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], code);
}

#[tokio::test]
async fn test_overlong_customer_name_is_bad_request() {
    let body = format!(r#"{{"company_name": "{}"}}"#, "C".repeat(256));
    let response = app()
        .oneshot(authed("POST", "/api/v1/customers", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "TOO_LONG");
}

#[tokio::test]
async fn test_overlong_quotation_prefix_setting_is_bad_request() {
    let body = format!(r#"{{"key": "quotation_prefix", "value": "{}"}}"#, "Q".repeat(45));
    let response = app()
        .oneshot(authed("PATCH", "/api/v1/settings", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");
}

#[tokio::test]
async fn test_non_uuid_path_is_rejected() {
    let response = app()
        .oneshot(authed("GET", "/api/v1/quotations/not-a-uuid", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
