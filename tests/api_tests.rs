/// Integration tests for the HTTP query API
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tuition_calculator::{
    calculator::TuitionCalculator, config::Config, dataset::CanonicalDataset, handlers::AppState,
    server::create_router,
};

fn dataset() -> CanonicalDataset {
    serde_json::from_value(json!({
        "base": {
            "علوم انسانی": {"سطح 1": 1000, "سطح 2": "1,200"},
            "فنی مهندسی": {"سطح 1": 1500}
        },
        "variable": {
            "دکتری تخصصی": {
                "نظری": {"علوم انسانی": {"سطح 1": 500}},
                "عملی": {"علوم انسانی": {"سطح 1": 700}}
            },
            "کارشناسی پیوسته": {
                "عملی": {"فنی مهندسی": {"سطح 1": 300}}
            }
        },
        "currency": {
            "دکتری تخصصی": {"پزشکی": {"سطح 1": 1234.5, "سطح 2": "n/a"}}
        },
        "selfGoverning": {
            "تهران": {"کارشناسی": 45000},
            "خارج از تهران": {"کارشناسی": 30000}
        }
    }))
    .unwrap()
}

fn app() -> Router {
    let state = AppState::new(TuitionCalculator::new(Arc::new(dataset())));
    create_router(&Config::default(), state, None)
}

/// Percent-encode a query value
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app(), request).await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app(), request).await
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_sections() {
    let (status, body) = get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sections"]["variable"], 2);
    assert_eq!(body["sections"]["selfGoverning"], 2);
}

#[tokio::test]
async fn test_data_returns_whole_dataset() {
    let (status, body) = get("/api/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(dataset()).unwrap());
}

#[tokio::test]
async fn test_degree_options() {
    let (status, body) = get("/api/options/degrees").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"options": ["دکتری تخصصی", "کارشناسی پیوسته"]}));
}

#[tokio::test]
async fn test_field_group_options_use_theoretical_table() {
    let uri = format!("/api/options/field-groups?degree={}", encode("دکتری تخصصی"));
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"], json!(["علوم انسانی"]));

    // Degree exists but has no theoretical table
    let uri = format!("/api/options/field-groups?degree={}", encode("کارشناسی پیوسته"));
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["options"], json!([]));
}

#[tokio::test]
async fn test_level_options() {
    let uri = format!("/api/options/levels?fieldGroup={}", encode("علوم انسانی"));
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"], json!(["سطح 1", "سطح 2"]));
}

#[tokio::test]
async fn test_unknown_parent_is_not_found() {
    let uri = format!("/api/options/levels?fieldGroup={}", encode("هنر"));
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["options"], json!([]));
    assert_eq!(body["error"]["type"], "not_found");

    let (status, _) = get("/api/options/self-governing-degrees").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_self_governing_options() {
    let (status, body) = get("/api/options/locations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"], json!(["تهران", "خارج از تهران"]));

    let uri = format!(
        "/api/options/self-governing-degrees?location={}",
        encode("خارج از تهران")
    );
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"], json!(["کارشناسی"]));
}

#[tokio::test]
async fn test_currency_options() {
    let (_, body) = get("/api/options/currency-degrees").await;
    assert_eq!(body["options"], json!(["دکتری تخصصی"]));

    let uri = format!(
        "/api/options/currency-field-groups?degree={}",
        encode("دکتری تخصصی")
    );
    let (_, body) = get(&uri).await;
    assert_eq!(body["options"], json!(["پزشکی"]));

    let uri = format!(
        "/api/options/currency-levels?degree={}&fieldGroup={}",
        encode("دکتری تخصصی"),
        encode("پزشکی")
    );
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"], json!(["سطح 1", "سطح 2"]));
}

#[tokio::test]
async fn test_calculate_standard() {
    let (status, body) = post(
        "/api/calculate",
        json!({
            "degree": "دکتری تخصصی",
            "fieldGroup": "علوم انسانی",
            "level": "سطح 1",
            "units": {"نظری": 2, "عملی": "1", "کارگاهی": 4}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "baseTuition": "1,000,000 تومان",
            "variableTuition": "1,700,000 تومان",
            "totalTuition": "2,700,000 تومان"
        })
    );
}

#[tokio::test]
async fn test_calculate_standard_missing_selections() {
    let (status, body) = post("/api/calculate", json!({"degree": "دکتری تخصصی", "level": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("fieldGroup"));
    assert!(message.contains("level"));
}

#[tokio::test]
async fn test_calculate_self_governing() {
    let (status, body) = post(
        "/api/calculate-self-governing",
        json!({"location": "تهران", "degree": "کارشناسی"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"totalTuition": "45,000,000 تومان"}));
}

#[tokio::test]
async fn test_calculate_currency() {
    let request = |level: &str| {
        json!({"degree": "دکتری تخصصی", "fieldGroup": "پزشکی", "level": level})
    };

    let (status, body) = post("/api/calculate-currency", request("سطح 1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"totalTuition": "$1,234.50"}));

    let (_, body) = post("/api/calculate-currency", request("سطح 2")).await;
    assert_eq!(body, json!({"totalTuition": "نامشخص"}));

    let (_, body) = post("/api/calculate-currency", request("سطح 9")).await;
    assert_eq!(body, json!({"totalTuition": "$0.00"}));
}

#[tokio::test]
async fn test_calculate_accepts_loosely_typed_fields() {
    let (status, body) = post(
        "/api/calculate",
        json!({
            "degree": "دکتری تخصصی",
            "fieldGroup": "علوم انسانی",
            "level": 1,
            "units": []
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseTuition"], "1,000,000 تومان");
    assert_eq!(body["variableTuition"], "0 تومان");

    // A non-string selection counts as missing rather than failing the body
    let (status, body) = post(
        "/api/calculate-self-governing",
        json!({"location": ["تهران"], "degree": "کارشناسی"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("location"));
}

#[tokio::test]
async fn test_calculate_level_with_persian_digit() {
    let (status, body) = post(
        "/api/calculate-currency",
        json!({"degree": "دکتری تخصصی", "fieldGroup": "پزشکی", "level": "سطح ۱"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"totalTuition": "$1,234.50"}));
}

#[tokio::test]
async fn test_unreadable_body_uses_error_envelope() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/calculate")
        .body(Body::from(r#"{"degree": "دکتری تخصصی"}"#))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/calculate-currency")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");
}
