//! grpc_client: walks an item through its whole lifecycle over gRPC, then
//! does the same for a feature flag.
//!
//! ```bash
//! cargo run --bin flagbase-server &
//! FLAGBASE_ADDR=http://127.0.0.1:50051 cargo run -p flagbase-sdk --example grpc_client
//! ```

use flagbase_sdk::{CreateFeatureParams, FlagbaseClient, UpdateFeatureParams};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let addr = std::env::var("FLAGBASE_ADDR").unwrap_or_else(|_| "http://127.0.0.1:50051".into());
    let mut client = FlagbaseClient::connect(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to {addr}: {e}"))?;
    println!("connected to {addr}");

    // ── Items ─────────────────────────────────────────
    let item = client.create_item("Test Item", 29.99).await?;
    println!("created item: id={} name={:?} value={}", item.id, item.name, item.value);

    let fetched = client.get_item(&item.id).await?;
    println!("fetched item: name={:?} value={} created_at={}", fetched.name, fetched.value, fetched.created_at);

    let updated = client.update_item(&item.id, "Updated Test Item", 39.99).await?;
    println!("updated item: name={:?} value={}", updated.name, updated.value);

    let items = client.list_items().await?;
    println!("listed {} item(s)", items.len());
    for i in &items {
        println!("  {} {:?} {}", i.id, i.name, i.value);
    }

    let ok = client.delete_item(&item.id).await?;
    println!("deleted item: success={ok}");

    // ── Features ──────────────────────────────────────
    let feature = client
        .create_feature(CreateFeatureParams {
            name:        "Test Feature".into(),
            value:       json!({ "enabled": true, "limit": 10 }),
            resource_id: "resource-1".into(),
            ..Default::default()
        })
        .await?;
    println!("created feature: id={} value={} active={}", feature.id, feature.value, feature.active);

    let feature = client
        .update_feature(
            &feature.id,
            UpdateFeatureParams {
                value:  json!({ "enabled": false, "limit": 20 }),
                active: false,
                ..feature.clone().into()
            },
        )
        .await?;
    println!("updated feature: value={} active={}", feature.value, feature.active);

    let scoped = client.list_features(Some("resource-1")).await?;
    println!("listed {} feature(s) for resource-1", scoped.len());

    let ok = client.delete_feature(&feature.id).await?;
    println!("deleted feature: success={ok}");

    Ok(())
}
