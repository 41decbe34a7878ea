//! Integration tests for the GraphQL backend against a local mock server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, response::IntoResponse};
use client::{
    ApplicationClient, ClientConfig, DiscountBackend, GraphQlBackend, ValidationClient,
    ValidationResult,
};
use common::{BookingId, Money};
use domain::{DiscountCode, DiscountKind, ErrorCategory};
use serde_json::{Value, json};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/graphql")
}

fn discount_json(code: &str, max_uses: Option<u32>, current_uses: u32) -> Value {
    json!({
        "code": code,
        "type": "PERCENTAGE",
        "amount": 20,
        "validUntil": "2099-12-31T23:59:59Z",
        "maxUses": max_uses,
        "currentUses": current_uses,
        "status": "ACTIVE"
    })
}

/// Mock GraphQL endpoint with a handful of known codes.
async fn graphql(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().push(body.clone());

    let query = body["query"].as_str().unwrap_or_default();
    let variables = &body["variables"];

    if query.contains("validateDiscountCode") {
        let subtotal = variables["subtotal"].as_i64().unwrap_or_default();
        let payload = match variables["code"].as_str().unwrap_or_default() {
            "SUMMER20" => json!({
                "valid": true,
                "reason": "",
                "discountCode": discount_json("SUMMER20", None, 0),
                "calculatedDiscount": subtotal / 5,
                "finalPriceCents": subtotal - subtotal / 5
            }),
            "POPULAR" => json!({
                "valid": false,
                "reason": "Usage limit reached",
                "discountCode": discount_json("POPULAR", Some(100), 100),
                "calculatedDiscount": null,
                "finalPriceCents": null
            }),
            _ => json!({
                "valid": false,
                "reason": "",
                "discountCode": null,
                "calculatedDiscount": null,
                "finalPriceCents": null
            }),
        };
        return Json(json!({ "data": { "validateDiscountCode": payload } }));
    }

    if query.contains("applyDiscountCode") {
        let payload = if variables["code"] == "SUMMER20" {
            json!({ "success": true, "message": "Discount applied", "discountApplied": 20 })
        } else {
            json!({ "success": false, "message": "Code not valid for booking", "discountApplied": null })
        };
        return Json(json!({ "data": { "applyDiscountCode": payload } }));
    }

    Json(json!({ "data": null, "errors": [{ "message": "Unknown operation" }] }))
}

async fn mock_backend() -> (GraphQlBackend, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/graphql", post(graphql))
        .with_state(seen.clone());
    let endpoint = spawn(router).await;
    (GraphQlBackend::from_config(&ClientConfig::new(endpoint)), seen)
}

#[tokio::test]
async fn test_validate_summer20_scenario() {
    let (backend, seen) = mock_backend().await;
    let client = ValidationClient::new(backend);

    let result = client.validate("summer20", Money::from_cents(5000)).await;

    match result {
        ValidationResult::Valid {
            discount,
            discount_amount,
            final_price,
        } => {
            assert_eq!(discount.code.as_str(), "SUMMER20");
            assert_eq!(discount.kind, DiscountKind::Percentage);
            assert_eq!(discount_amount.cents(), 1000);
            assert_eq!(final_price.cents(), 4000);
        }
        other => panic!("expected valid result, got {other:?}"),
    }

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["variables"]["code"], "SUMMER20");
    assert_eq!(requests[0]["variables"]["subtotal"], 5000);
}

#[tokio::test]
async fn test_null_record_is_invalid_code() {
    let (backend, _) = mock_backend().await;
    let client = ValidationClient::new(backend);

    let result = client.validate("nothing", Money::from_cents(5000)).await;

    assert_eq!(result.error(), Some(ErrorCategory::InvalidCode));
}

#[tokio::test]
async fn test_exhausted_record_is_no_uses_left() {
    let (backend, _) = mock_backend().await;
    let client = ValidationClient::new(backend);

    let result = client.validate("popular", Money::from_cents(5000)).await;

    assert_eq!(result.error(), Some(ErrorCategory::NoUsesLeft));
    assert_eq!(result.message(), Some("Usage limit reached"));
}

#[tokio::test]
async fn test_apply_mutation() {
    let (backend, seen) = mock_backend().await;
    let client = ApplicationClient::new(backend);
    let booking = BookingId::new(314).unwrap();

    let applied = client.apply("summer20", booking).await;
    assert!(applied.success);
    assert_eq!(applied.discount_applied, Some(20));

    let rejected = client.apply("other", booking).await;
    assert!(!rejected.success);
    assert_eq!(rejected.message, "Code not valid for booking");

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0]["variables"]["bookingId"], 314);
}

#[tokio::test]
async fn test_http_error_is_network_error() {
    let router = Router::new().route(
        "/graphql",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let client = ValidationClient::new(GraphQlBackend::new(spawn(router).await));

    let result = client.validate("SUMMER20", Money::from_cents(5000)).await;

    assert_eq!(result.error(), Some(ErrorCategory::NetworkError));
    assert_eq!(result.message(), Some("Backend returned HTTP 500"));
}

#[tokio::test]
async fn test_graphql_errors_surface_as_client_error() {
    let router = Router::new().route(
        "/graphql",
        post(|| async { Json(json!({ "data": null, "errors": [{ "message": "rate limited" }] })) }),
    );
    let backend = GraphQlBackend::new(spawn(router).await);

    let err = backend
        .validate_code(&DiscountCode::from("SUMMER20"), Money::from_cents(100))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "GraphQL error: rate limited");

    let client = ValidationClient::new(backend);
    let result = client.validate("SUMMER20", Money::from_cents(100)).await;
    assert_eq!(result.error(), Some(ErrorCategory::NetworkError));
}

#[tokio::test]
async fn test_partial_errors_alongside_data_are_tolerated() {
    let router = Router::new().route(
        "/graphql",
        post(|| async {
            Json(json!({
                "data": {
                    "applyDiscountCode": {
                        "success": true,
                        "message": "Discount applied",
                        "discountApplied": 20
                    }
                },
                "errors": [{ "message": "booking audit log unavailable" }]
            }))
        }),
    );
    let backend = GraphQlBackend::new(spawn(router).await);

    let response = backend
        .apply_code(&DiscountCode::from("SUMMER20"), BookingId::new(7).unwrap())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.discount_applied, Some(20));
}

#[tokio::test]
async fn test_malformed_body_is_network_error() {
    let router = Router::new().route("/graphql", post(|| async { "not json" }));
    let client = ApplicationClient::new(GraphQlBackend::new(spawn(router).await));

    let result = client
        .apply("SUMMER20", BookingId::new(1).unwrap())
        .await;

    assert!(!result.success);
    assert!(result.message.starts_with("Invalid response"));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ValidationClient::new(GraphQlBackend::new(format!("http://{addr}/graphql")));
    let result = client.validate("SUMMER20", Money::from_cents(5000)).await;

    assert_eq!(result.error(), Some(ErrorCategory::NetworkError));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let router = Router::new().route(
        "/graphql",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({ "data": null }))
        }),
    );
    let backend = GraphQlBackend::new(spawn(router).await);
    let client = ValidationClient::new(backend).with_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let result = client.validate("SUMMER20", Money::from_cents(5000)).await;

    assert_eq!(
        result,
        ValidationResult::Invalid {
            error: ErrorCategory::NetworkError,
            message: "Request timeout".to_string(),
        }
    );
    assert!(started.elapsed() < Duration::from_secs(5));
}
