//! Handler tests for Products domain
//!
//! These drive the products router end to end over the in-memory store:
//! - Field-level validation and the exact number of reported errors
//! - `{ "data": ... }` envelopes and status codes
//! - The not-found body for unknown ids

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(ProductService::new(InMemoryProductRepository::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn error_count(body: &Value) -> usize {
    body["errors"].as_array().map(Vec::len).unwrap_or_default()
}

async fn seed(app: &Router) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/",
        Some(json!({"name": "Monitor Curvo", "price": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

// ============================================================================
// POST /
// ============================================================================

#[tokio::test]
async fn test_create_empty_body_reports_four_errors() {
    let (status, body) = send(&app(), "POST", "/", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 4);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_create_zero_price_reports_one_error() {
    let (status, body) = send(
        &app(),
        "POST",
        "/",
        Some(json!({"name": "Monitor Curvo", "price": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 1);
    assert_eq!(body["errors"][0]["msg"], "El precio debe ser mayor a 0");
}

#[tokio::test]
async fn test_create_non_numeric_price_reports_two_errors() {
    let (status, body) = send(
        &app(),
        "POST",
        "/",
        Some(json!({"name": "Monitor Curvo", "price": "Hola"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 2);
    assert_eq!(body["errors"][0]["path"], "price");
    assert_eq!(body["errors"][0]["location"], "body");
    assert_eq!(body["errors"][0]["type"], "field");
    assert_eq!(body["errors"][0]["value"], "Hola");
}

#[tokio::test]
async fn test_create_valid_product() {
    let (status, body) = send(
        &app(),
        "POST",
        "/",
        Some(json!({"name": "Mouse - Testing", "price": 50})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Mouse - Testing");
    assert_eq!(body["data"]["price"], 50.0);
    assert_eq!(body["data"]["availability"], true);
    assert!(body["data"]["created_at"].is_string());
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id_and_availability() {
    let (status, body) = send(
        &app(),
        "POST",
        "/",
        Some(json!({"id": 77, "name": "TV", "price": "10.5", "availability": false})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["price"], 10.5);
    assert_eq!(body["data"]["availability"], true);
}

#[tokio::test]
async fn test_create_malformed_json_uses_generic_fault() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name": "#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "INVALID_JSON");
}

// ============================================================================
// GET /
// ============================================================================

#[tokio::test]
async fn test_list_returns_newest_first() {
    let app = app();
    seed(&app).await;
    seed(&app).await;

    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(body.get("errors").is_none());
}

// ============================================================================
// GET /{id}
// ============================================================================

#[tokio::test]
async fn test_get_unknown_product_is_not_found() {
    let (status, body) = send(&app(), "GET", "/2000", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Producto no encontrado"}));
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let app = app();
    seed(&app).await;

    let (first_status, first) = send(&app, "GET", "/1", None).await;
    let (second_status, second) = send(&app, "GET", "/1", None).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_undecodable_id_reports_one_error() {
    let app = app();
    seed(&app).await;

    for method in ["GET", "PATCH", "DELETE"] {
        let (status, body) = send(&app, method, "/%FF", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(error_count(&body), 1, "{method}");
        assert_eq!(body["errors"][0]["msg"], "Id no valido");
        assert_eq!(body["errors"][0]["path"], "id");
        assert_eq!(body["errors"][0]["location"], "params");
        assert_eq!(body["errors"][0]["value"], "%FF");
    }

    let (_, body) = send(&app, "GET", "/1", None).await;
    assert_eq!(body["data"]["availability"], true);
}

#[tokio::test]
async fn test_replace_undecodable_id_with_valid_body_reports_one_error() {
    let (status, body) = send(
        &app(),
        "PUT",
        "/%FF",
        Some(json!({"name": "Monitor Curvo", "availability": true, "price": 300})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 1);
    assert_eq!(body["errors"][0]["msg"], "Id no valido");
}

#[tokio::test]
async fn test_get_invalid_id_reports_one_error() {
    let (status, body) = send(&app(), "GET", "/not-valid-url", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 1);
    assert_eq!(body["errors"][0]["msg"], "Id no valido");
    assert_eq!(body["errors"][0]["location"], "params");
}

#[tokio::test]
async fn test_get_existing_product() {
    let app = app();
    let created = seed(&app).await;

    let (status, body) = send(&app, "GET", "/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);
}

// ============================================================================
// PUT /{id}
// ============================================================================

#[tokio::test]
async fn test_replace_invalid_id_with_valid_body_reports_one_error() {
    let (status, body) = send(
        &app(),
        "PUT",
        "/not-valid-url",
        Some(json!({"name": "Monitor Curvo", "availability": true, "price": 300})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 1);
    assert_eq!(body["errors"][0]["msg"], "Id no valido");
}

#[tokio::test]
async fn test_replace_empty_body_reports_five_errors() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, "PUT", "/1", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 5);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_replace_zero_price_reports_one_error() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/1",
        Some(json!({"name": "Monitor Curvo", "availability": true, "price": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 1);
    assert_eq!(body["errors"][0]["msg"], "El precio debe ser mayor a 0");
}

#[tokio::test]
async fn test_replace_unknown_product_is_not_found() {
    let (status, body) = send(
        &app(),
        "PUT",
        "/2000",
        Some(json!({"name": "Monitor Curvo", "availability": true, "price": 300})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_replace_existing_product() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/1",
        Some(json!({"name": "Monitor Curvo", "availability": true, "price": 300})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["price"], 300.0);
    assert_eq!(body["data"]["availability"], true);
}

// ============================================================================
// PATCH /{id}
// ============================================================================

#[tokio::test]
async fn test_toggle_unknown_product_is_not_found() {
    let (status, body) = send(&app(), "PATCH", "/2000", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_toggle_flips_availability_each_time() {
    let app = app();
    let created = seed(&app).await;

    let (status, body) = send(&app, "PATCH", "/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["availability"], false);
    assert!(body.get("error").is_none());
    assert_eq!(body["data"]["name"], created["name"]);
    assert_eq!(body["data"]["price"], created["price"]);

    let (_, body) = send(&app, "PATCH", "/1", None).await;
    assert_eq!(body["data"]["availability"], true);
}

#[tokio::test]
async fn test_toggle_ignores_request_body() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, "PATCH", "/1", Some(json!({"availability": true}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["availability"], false);
}

// ============================================================================
// DELETE /{id}
// ============================================================================

#[tokio::test]
async fn test_delete_invalid_id_reports_one_error() {
    let (status, body) = send(&app(), "DELETE", "/not-valid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_count(&body), 1);
    assert_eq!(body["errors"][0]["msg"], "Id no valido");
}

#[tokio::test]
async fn test_delete_unknown_product_is_not_found() {
    let (status, body) = send(&app(), "DELETE", "/2000", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
}

#[tokio::test]
async fn test_delete_existing_product() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, "DELETE", "/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "Producto Eliminado");

    let (status, _) = send(&app, "GET", "/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
