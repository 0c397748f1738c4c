//! HTTP/JSON transport: REST API over the shared repositories.
//!
//! Endpoints:
//!   GET    /api/health              → liveness probe
//!   GET    /api/items               → all items
//!   POST   /api/items               → create item
//!   GET    /api/items/:id           → single item
//!   PUT    /api/items/:id           → overwrite name + value
//!   DELETE /api/items/:id           → remove item
//!   GET    /api/features            → all features (`?resourceId=` filters)
//!   POST   /api/features            → create feature
//!   GET    /api/features/:id        → single feature
//!   PUT    /api/features/:id        → overwrite every mutable field
//!   DELETE /api/features/:id        → remove feature
//!   GET    /metrics                 → Prometheus text exposition
//!
//! Errors are returned as `{"error": "<message>"}` with 400 / 404 / 500.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use flagbase_api::{Operation, OperationMetrics, Resource};
use flagbase_table::{
    ErrorKind, FeatureRepository, FeatureUpdate, ItemRepository, NewFeature, StoreError,
};

// ── Shared state ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub items: ItemRepository,
    pub features: FeatureRepository,
    pub metrics: Arc<OperationMetrics>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(prometheus_metrics))
        .route("/api/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/features", get(list_features).post(create_feature))
        .route(
            "/api/features/:id",
            get(get_feature).put(update_feature).delete(delete_feature),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, router(state)).await
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn store_error(e: &StoreError) -> Response {
    let status = match e.kind() {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, e.to_string())
}

impl AppState {
    /// Count the request and turn a repository outcome into a response.
    fn respond<T>(
        &self,
        resource: Resource,
        op: Operation,
        result: Result<T, StoreError>,
        ok: impl FnOnce(T) -> Response,
    ) -> Response {
        self.metrics.record(resource, op);
        match result {
            Ok(v) => ok(v),
            Err(e) => {
                self.metrics.record_error();
                warn!(?resource, ?op, error = %e, "HTTP request failed");
                store_error(&e)
            }
        }
    }

    fn bad_body(&self, resource: Resource, op: Operation, rejection: JsonRejection) -> Response {
        self.metrics.record(resource, op);
        self.metrics.record_error();
        warn!(?resource, ?op, error = %rejection, "rejected request body");
        error_body(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ItemBody {
    #[serde(default)]
    name: String,
    /// `null` and omitted both decode as 0.
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FeatureBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default, rename = "resourceId")]
    resource_id: String,
    #[serde(default)]
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FeatureQuery {
    #[serde(rename = "resourceId")]
    resource_id: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

// GET /metrics
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(),
    )
}

// GET /api/health
async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy"}))
}

// ── Items ─────────────────────────────────────────────────────────────────────

// GET /api/items
async fn list_items(State(state): State<AppState>) -> Response {
    let result = state.items.list();
    state.respond(Resource::Item, Operation::List, result, |items| {
        Json(items).into_response()
    })
}

// POST /api/items
async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return state.bad_body(Resource::Item, Operation::Create, rej),
    };
    let result = state.items.create(&body.name, body.value.unwrap_or_default());
    state.respond(Resource::Item, Operation::Create, result, |item| {
        (StatusCode::CREATED, Json(item)).into_response()
    })
}

// GET /api/items/:id
async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.items.get(&id);
    state.respond(Resource::Item, Operation::Get, result, |item| {
        Json(item).into_response()
    })
}

// PUT /api/items/:id
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return state.bad_body(Resource::Item, Operation::Update, rej),
    };
    let result = state.items.update(&id, &body.name, body.value.unwrap_or_default());
    state.respond(Resource::Item, Operation::Update, result, |item| {
        Json(item).into_response()
    })
}

// DELETE /api/items/:id
async fn delete_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.items.delete(&id);
    state.respond(Resource::Item, Operation::Delete, result, |()| {
        StatusCode::NO_CONTENT.into_response()
    })
}

// ── Features ──────────────────────────────────────────────────────────────────

// GET /api/features?resourceId=
async fn list_features(
    State(state): State<AppState>,
    Query(q): Query<FeatureQuery>,
) -> Response {
    let result = state.features.list(q.resource_id.as_deref());
    state.respond(Resource::Feature, Operation::List, result, |features| {
        Json(features).into_response()
    })
}

// POST /api/features
async fn create_feature(
    State(state): State<AppState>,
    body: Result<Json<FeatureBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return state.bad_body(Resource::Feature, Operation::Create, rej),
    };
    let input = NewFeature {
        name: body.name,
        value: body.value,
        resource_id: body.resource_id,
        active: body.active,
    };
    let result = state.features.create(input);
    state.respond(Resource::Feature, Operation::Create, result, |feature| {
        (StatusCode::CREATED, Json(feature)).into_response()
    })
}

// GET /api/features/:id
async fn get_feature(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.features.get(&id);
    state.respond(Resource::Feature, Operation::Get, result, |feature| {
        Json(feature).into_response()
    })
}

// PUT /api/features/:id
async fn update_feature(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FeatureBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return state.bad_body(Resource::Feature, Operation::Update, rej),
    };
    // An omitted flag decodes as false.
    let update = FeatureUpdate {
        name: body.name,
        value: body.value,
        resource_id: body.resource_id,
        active: body.active.unwrap_or(false),
    };
    let result = state.features.update(&id, update);
    state.respond(Resource::Feature, Operation::Update, result, |feature| {
        Json(feature).into_response()
    })
}

// DELETE /api/features/:id
async fn delete_feature(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.features.delete(&id);
    state.respond(Resource::Feature, Operation::Delete, result, |()| {
        StatusCode::NO_CONTENT.into_response()
    })
}
