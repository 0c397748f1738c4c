//! Async Rust client for the flagbase gRPC API.
//!
//! Holds one tonic [`Channel`] shared by the generated `ItemServiceClient` and
//! `FeatureServiceClient`. Every call returns the decoded domain record or the
//! server's [`tonic::Status`] unchanged.
//!
//! ## Example
//!
//! ```rust,ignore
//! use flagbase_sdk::FlagbaseClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = FlagbaseClient::connect("http://127.0.0.1:50051").await?;
//!
//!     let item = client.create_item("Test Item", 29.99).await?;
//!     let item = client.update_item(&item.id, "Updated Test Item", 39.99).await?;
//!     println!("{} = {}", item.name, item.value);
//!
//!     client.delete_item(&item.id).await?;
//!     Ok(())
//! }
//! ```

use flagbase_api::convert::{feature_from_proto, item_from_proto, json_to_value};
use flagbase_api::pb::{
    feature_service_client::FeatureServiceClient, item_service_client::ItemServiceClient,
    CreateFeatureRequest, CreateItemRequest, DeleteFeatureRequest, DeleteItemRequest,
    GetFeatureRequest, GetItemRequest, ListFeaturesRequest, ListItemsRequest,
    UpdateFeatureRequest, UpdateItemRequest,
};
use flagbase_table::{Feature, Item};
use tonic::transport::{Channel, Uri};

// ─────────────────────────────────────────────
// Client-side typed structs
// ─────────────────────────────────────────────

/// Parameters for `create_feature`.
#[derive(Debug, Clone)]
pub struct CreateFeatureParams {
    pub name:        String,
    /// Any JSON document.
    pub value:       serde_json::Value,
    pub resource_id: String,
    /// `None` leaves the flag unset on the wire.
    pub active:      Option<bool>,
}

impl Default for CreateFeatureParams {
    fn default() -> Self {
        Self {
            name:        String::new(),
            value:       serde_json::Value::Null,
            resource_id: String::new(),
            active:      Some(true),
        }
    }
}

/// Parameters for `update_feature`. Every field replaces the stored one.
#[derive(Debug, Clone)]
pub struct UpdateFeatureParams {
    pub name:        String,
    pub value:       serde_json::Value,
    pub resource_id: String,
    pub active:      bool,
}

impl Default for UpdateFeatureParams {
    fn default() -> Self {
        Self {
            name:        String::new(),
            value:       serde_json::Value::Null,
            resource_id: String::new(),
            active:      true,
        }
    }
}

impl From<Feature> for UpdateFeatureParams {
    /// Start an update from the record's current state.
    fn from(f: Feature) -> Self {
        Self {
            name:        f.name,
            value:       f.value,
            resource_id: f.resource_id,
            active:      f.active,
        }
    }
}

// ─────────────────────────────────────────────
// FlagbaseClient
// ─────────────────────────────────────────────

/// Async gRPC client for flagbase.
///
/// Cloning is cheap: clones share the underlying [`Channel`].
#[derive(Clone)]
pub struct FlagbaseClient {
    items:    ItemServiceClient<Channel>,
    features: FeatureServiceClient<Channel>,
}

impl FlagbaseClient {
    // ── Construction ──────────────────────────────────

    /// Connect to a flagbase gRPC endpoint such as `"http://127.0.0.1:50051"`.
    pub async fn connect(uri: impl AsRef<str>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let parsed: Uri = uri.as_ref().parse()?;
        let channel = Channel::builder(parsed).connect().await?;
        Ok(Self::from_channel(channel))
    }

    /// Build a client over an existing channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            items:    ItemServiceClient::new(channel.clone()),
            features: FeatureServiceClient::new(channel),
        }
    }

    // ── Items ─────────────────────────────────────────

    pub async fn create_item(&mut self, name: &str, value: f64) -> Result<Item, tonic::Status> {
        let req = CreateItemRequest { name: name.to_string(), value };
        let resp = self.items.create_item(req).await?;
        item_from_proto(resp.into_inner())
    }

    pub async fn get_item(&mut self, id: &str) -> Result<Item, tonic::Status> {
        let req = GetItemRequest { id: id.to_string() };
        let resp = self.items.get_item(req).await?;
        item_from_proto(resp.into_inner())
    }

    /// All items, in store order.
    pub async fn list_items(&mut self) -> Result<Vec<Item>, tonic::Status> {
        let resp = self.items.list_items(ListItemsRequest {}).await?;
        resp.into_inner().items.into_iter().map(item_from_proto).collect()
    }

    /// Replace an item's name and value; `id` and `created_at` are kept.
    pub async fn update_item(
        &mut self,
        id:    &str,
        name:  &str,
        value: f64,
    ) -> Result<Item, tonic::Status> {
        let req = UpdateItemRequest { id: id.to_string(), name: name.to_string(), value };
        let resp = self.items.update_item(req).await?;
        item_from_proto(resp.into_inner())
    }

    pub async fn delete_item(&mut self, id: &str) -> Result<bool, tonic::Status> {
        let req = DeleteItemRequest { id: id.to_string() };
        let resp = self.items.delete_item(req).await?;
        Ok(resp.into_inner().success)
    }

    // ── Features ──────────────────────────────────────

    pub async fn create_feature(
        &mut self,
        params: CreateFeatureParams,
    ) -> Result<Feature, tonic::Status> {
        let req = CreateFeatureRequest {
            name:        params.name,
            value:       Some(json_to_value(&params.value)),
            resource_id: params.resource_id,
            active:      params.active,
        };
        let resp = self.features.create_feature(req).await?;
        feature_from_proto(resp.into_inner())
    }

    pub async fn get_feature(&mut self, id: &str) -> Result<Feature, tonic::Status> {
        let req = GetFeatureRequest { id: id.to_string() };
        let resp = self.features.get_feature(req).await?;
        feature_from_proto(resp.into_inner())
    }

    /// Features attached to `resource_id`, or every feature when `None`.
    pub async fn list_features(
        &mut self,
        resource_id: Option<&str>,
    ) -> Result<Vec<Feature>, tonic::Status> {
        let req = ListFeaturesRequest { resource_id: resource_id.unwrap_or_default().to_string() };
        let resp = self.features.list_features(req).await?;
        resp.into_inner().features.into_iter().map(feature_from_proto).collect()
    }

    pub async fn update_feature(
        &mut self,
        id:     &str,
        params: UpdateFeatureParams,
    ) -> Result<Feature, tonic::Status> {
        let req = UpdateFeatureRequest {
            id:          id.to_string(),
            name:        params.name,
            value:       Some(json_to_value(&params.value)),
            resource_id: params.resource_id,
            active:      params.active,
        };
        let resp = self.features.update_feature(req).await?;
        feature_from_proto(resp.into_inner())
    }

    pub async fn delete_feature(&mut self, id: &str) -> Result<bool, tonic::Status> {
        let req = DeleteFeatureRequest { id: id.to_string() };
        let resp = self.features.delete_feature(req).await?;
        Ok(resp.into_inner().success)
    }
}
