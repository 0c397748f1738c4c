//! HTTP/JSON API tests.
//!
//! The axum router is driven in-process with `tower::ServiceExt::oneshot`
//! against an in-memory store, or an on-disk one where a test needs to reach
//! the file directly.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use flagbase_server::config::Config;
use flagbase_server::rest::router;
use flagbase_server::{build_state, state_from_store};
use flagbase_table::Store;

fn app() -> Router {
    let store = Arc::new(Store::open_memory().unwrap());
    let mut config = Config::from_env();
    config.force_active_on_create = true;
    router(state_from_store(store, &config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ══════════════════════════════════════════════════════════════════════════════
// Health + metrics
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn metrics_count_requests() {
    let app = app();
    send(&app, Method::GET, "/api/items", None).await;
    send(&app, Method::GET, "/api/items/missing", None).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec(),
    )
    .unwrap();
    assert!(text.contains("flagbase_requests_total{resource=\"item\",op=\"list\"} 1"));
    assert!(text.contains("flagbase_requests_total{resource=\"item\",op=\"get\"} 1"));
    assert!(text.contains("flagbase_errors_total 1"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Items
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn item_create_get_delete_scenario() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(json!({"name": "Test Item", "value": 29.99})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "Test Item");
    assert_eq!(created["value"], 29.99);
    assert!(created["created_at"].is_string());

    let (status, fetched) = send(&app, Method::GET, &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "item not found");
}

#[tokio::test]
async fn item_create_missing_name_is_400() {
    let (status, body) = send(&app(), Method::POST, "/api/items", Some(json!({"value": 1.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");
}

#[tokio::test]
async fn item_create_malformed_json_is_400() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/items")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_null_value_decodes_as_zero() {
    let (status, created) = send(
        &app(),
        Method::POST,
        "/api/items",
        Some(json!({"name": "x", "value": null})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["value"], 0.0);
}

#[tokio::test]
async fn item_list_empty_then_populated() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for name in ["Item 1", "Item 2"] {
        send(&app, Method::POST, "/api/items", Some(json!({"name": name, "value": 1.5}))).await;
    }
    let (_, body) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn item_update() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(json!({"name": "Test Item", "value": 29.99})),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/items/{id}"),
        Some(json!({"name": "Updated Item", "value": 39.99})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["name"], "Updated Item");
    assert_eq!(updated["value"], 39.99);
}

#[tokio::test]
async fn item_update_and_delete_missing_are_404() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/items/non-existent-id",
        Some(json!({"name": "x", "value": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/items/non-existent-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ══════════════════════════════════════════════════════════════════════════════
// Features
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn feature_create_and_update_scenario() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/features",
        Some(json!({"name": "F", "value": "v", "resourceId": "r1", "active": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["value"], "v");
    assert_eq!(created["resourceId"], "r1");
    assert_eq!(created["active"], true);
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/features/{id}"),
        Some(json!({"name": "F2", "value": {"k": "v2"}, "resourceId": "r2", "active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "F2");
    assert_eq!(updated["value"], json!({"k": "v2"}));
    assert_eq!(updated["resourceId"], "r2");
    assert_eq!(updated["active"], false);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/features/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn feature_value_kinds_keep_their_type() {
    let app = app();
    for value in [json!("test-value"), json!(42), json!({"key": "value", "enabled": true}), json!([1, 2])] {
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/features",
            Some(json!({"name": "F", "value": value, "resourceId": "resource-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["value"], value);
    }
}

#[tokio::test]
async fn feature_created_inactive_is_active() {
    let (status, created) = send(
        &app(),
        Method::POST,
        "/api/features",
        Some(json!({"name": "F", "value": true, "resourceId": "r1", "active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["active"], true);
}

#[tokio::test]
async fn feature_missing_fields_are_400() {
    let app = app();
    for body in [
        json!({"value": "test-value", "resourceId": "resource-1"}),
        json!({"name": "Test Feature", "value": "test-value"}),
    ] {
        let (status, resp) = send(&app, Method::POST, "/api/features", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"], "name and resource_id are required");
    }
}

#[tokio::test]
async fn feature_list_filter_by_resource_id() {
    let app = app();
    for (name, resource) in [("a", "resource-1"), ("b", "resource-1"), ("c", "resource-2")] {
        send(
            &app,
            Method::POST,
            "/api/features",
            Some(json!({"name": name, "value": name, "resourceId": resource})),
        )
        .await;
    }

    let (status, all) = send(&app, Method::GET, "/api/features", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, filtered) = send(&app, Method::GET, "/api/features?resourceId=resource-1", None).await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|f| f["resourceId"] == "resource-1"));

    let (status, none) = send(&app, Method::GET, "/api/features?resourceId=unknown", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn feature_delete_then_get_is_404() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/features",
        Some(json!({"name": "F", "value": 1, "resourceId": "r1"})),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/features/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/api/features/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "feature not found");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/features/{id}"),
        Some(json!({"name": "F", "value": 1, "resourceId": "r1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feature_unreadable_value_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flagbase.db");
    let mut config = Config::from_env();
    config.db_path = path.to_string_lossy().into_owned();
    let app = router(build_state(&config).unwrap());

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/features",
        Some(json!({"name": "F", "value": {"k": "v"}, "resourceId": "r1"})),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute("UPDATE features SET value = '{1: 2}' WHERE id = ?1", [id])
        .unwrap();
    drop(raw);

    let (status, body) = send(&app, Method::GET, &format!("/api/features/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().is_empty());
}
