//! Tests for flagbase-sdk.
//!
//! Parameter structs are checked offline. The end-to-end tests start the
//! gRPC services on a loopback listener backed by an in-memory store and
//! drive them through [`FlagbaseClient`].

use std::net::SocketAddr;
use std::sync::Arc;

use flagbase_api::{FeatureServer, ItemServer, OperationMetrics};
use flagbase_sdk::{CreateFeatureParams, FlagbaseClient, UpdateFeatureParams};
use flagbase_table::{FeatureRepository, ItemRepository, Store};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::Code;

async fn spawn_server() -> SocketAddr {
    let store = Arc::new(Store::open_memory().unwrap());
    let metrics = Arc::new(OperationMetrics::new());
    let items = ItemServer::new(ItemRepository::new(Arc::clone(&store)), Arc::clone(&metrics));
    let features = FeatureServer::new(FeatureRepository::new(store), metrics);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(items.into_service())
            .add_service(features.into_service())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    addr
}

async fn client() -> FlagbaseClient {
    let addr = spawn_server().await;
    FlagbaseClient::connect(format!("http://{addr}")).await.unwrap()
}

// ══════════════════════════════════════════════════════════════════════════════
// Parameter structs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn create_feature_params_default() {
    let p = CreateFeatureParams::default();
    assert!(p.name.is_empty());
    assert!(p.resource_id.is_empty());
    assert_eq!(p.value, serde_json::Value::Null);
    assert_eq!(p.active, Some(true));
}

#[test]
fn create_feature_params_struct_update_syntax() {
    let p = CreateFeatureParams {
        name: "F".into(),
        resource_id: "r1".into(),
        ..Default::default()
    };
    assert_eq!(p.name, "F");
    assert_eq!(p.active, Some(true));
}

#[test]
fn update_feature_params_default() {
    let p = UpdateFeatureParams::default();
    assert!(p.name.is_empty());
    assert!(p.active);
}

// ══════════════════════════════════════════════════════════════════════════════
// Connection
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn connect_to_invalid_address_fails() {
    let result = FlagbaseClient::connect("http://127.0.0.1:1").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn connect_rejects_garbage_uri() {
    let result = FlagbaseClient::connect("not a valid uri!!!").await;
    assert!(result.is_err());
}

// ══════════════════════════════════════════════════════════════════════════════
// End to end
// ══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn item_lifecycle_over_the_wire() {
    let mut c = client().await;

    let created = c.create_item("Test Item", 29.99).await.unwrap();
    assert_eq!(created.name, "Test Item");
    assert_eq!(created.value, 29.99);

    let fetched = c.get_item(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = c.update_item(&created.id, "Updated Test Item", 39.99).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.name, "Updated Test Item");

    assert_eq!(c.list_items().await.unwrap(), vec![updated]);

    assert!(c.delete_item(&created.id).await.unwrap());
    let err = c.get_item(&created.id).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[tokio::test]
async fn invalid_item_is_rejected() {
    let mut c = client().await;
    let err = c.create_item("", 1.0).await.unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn feature_lifecycle_over_the_wire() {
    let mut c = client().await;

    let created = c
        .create_feature(CreateFeatureParams {
            name: "F".into(),
            value: json!({"key": "value", "enabled": true}),
            resource_id: "resource-1".into(),
            active: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(created.value, json!({"key": "value", "enabled": true}));
    assert!(created.active);

    c.create_feature(CreateFeatureParams {
        name: "G".into(),
        value: json!(42),
        resource_id: "resource-2".into(),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(c.list_features(None).await.unwrap().len(), 2);
    let scoped = c.list_features(Some("resource-1")).await.unwrap();
    assert_eq!(scoped, vec![created.clone()]);

    let updated = c
        .update_feature(
            &created.id,
            UpdateFeatureParams {
                name: "F2".into(),
                value: json!({"k": "v2"}),
                active: false,
                ..created.clone().into()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "F2");
    assert_eq!(updated.value, json!({"k": "v2"}));
    assert_eq!(updated.resource_id, "resource-1");
    assert!(!updated.active);
    assert_eq!(c.get_feature(&created.id).await.unwrap(), updated);

    assert!(c.delete_feature(&created.id).await.unwrap());
    let err = c.delete_feature(&created.id).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}
