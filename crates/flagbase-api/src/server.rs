//! gRPC service implementations for flagbase.
//!
//! [`ItemServer`] and [`FeatureServer`] are thin adapters: they decode the
//! request message, call the shared repository from `flagbase-table`, and
//! encode the result. Repository errors become `tonic::Status` through
//! [`store_err`]:
//!
//! | Repository outcome | Status code        |
//! |--------------------|--------------------|
//! | `InvalidInput`     | `InvalidArgument`  |
//! | `NotFound`         | `NotFound`         |
//! | anything else      | `Internal`         |

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{instrument, warn};

use flagbase_table::{
    ErrorKind, FeatureRepository, FeatureUpdate, ItemRepository, NewFeature, StoreError,
};

use crate::convert::{feature_to_proto, item_to_proto, value_to_json};
use crate::metrics::{Operation, OperationMetrics, Resource};
use crate::proto::flagbase::{
    self,
    feature_service_server::{FeatureService, FeatureServiceServer},
    item_service_server::{ItemService, ItemServiceServer},
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Map a repository error to the matching gRPC status.
pub fn store_err(e: StoreError) -> Status {
    match e.kind() {
        ErrorKind::InvalidInput => Status::invalid_argument(e.to_string()),
        ErrorKind::NotFound => Status::not_found(e.to_string()),
        ErrorKind::Internal => Status::internal(e.to_string()),
    }
}

/// Count the call, and on failure count and log the error.
fn observe<T>(
    metrics: &OperationMetrics,
    resource: Resource,
    op: Operation,
    result: Result<T, Status>,
) -> Result<Response<T>, Status> {
    metrics.record(resource, op);
    match result {
        Ok(body) => Ok(Response::new(body)),
        Err(status) => {
            metrics.record_error();
            warn!(?resource, ?op, code = ?status.code(), message = status.message(), "gRPC request failed");
            Err(status)
        }
    }
}

// ── ItemServer ────────────────────────────────────────────────────────────────

/// `flagbase.ItemService` backed by an [`ItemRepository`].
pub struct ItemServer {
    items: ItemRepository,
    metrics: Arc<OperationMetrics>,
}

impl ItemServer {
    pub fn new(items: ItemRepository, metrics: Arc<OperationMetrics>) -> Self {
        Self { items, metrics }
    }

    /// Wrap this server in the tonic-generated [`ItemServiceServer`].
    pub fn into_service(self) -> ItemServiceServer<Self> {
        ItemServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ItemService for ItemServer {
    #[instrument(skip_all)]
    async fn create_item(
        &self,
        req: Request<flagbase::CreateItemRequest>,
    ) -> Result<Response<flagbase::Item>, Status> {
        let r = req.into_inner();
        let result = self
            .items
            .create(&r.name, r.value)
            .map(item_to_proto)
            .map_err(store_err);
        observe(&self.metrics, Resource::Item, Operation::Create, result)
    }

    #[instrument(skip_all)]
    async fn get_item(
        &self,
        req: Request<flagbase::GetItemRequest>,
    ) -> Result<Response<flagbase::Item>, Status> {
        let r = req.into_inner();
        let result = self.items.get(&r.id).map(item_to_proto).map_err(store_err);
        observe(&self.metrics, Resource::Item, Operation::Get, result)
    }

    #[instrument(skip_all)]
    async fn list_items(
        &self,
        _req: Request<flagbase::ListItemsRequest>,
    ) -> Result<Response<flagbase::ListItemsResponse>, Status> {
        let result = self
            .items
            .list()
            .map(|items| flagbase::ListItemsResponse {
                items: items.into_iter().map(item_to_proto).collect(),
            })
            .map_err(store_err);
        observe(&self.metrics, Resource::Item, Operation::List, result)
    }

    #[instrument(skip_all)]
    async fn update_item(
        &self,
        req: Request<flagbase::UpdateItemRequest>,
    ) -> Result<Response<flagbase::Item>, Status> {
        let r = req.into_inner();
        let result = self
            .items
            .update(&r.id, &r.name, r.value)
            .map(item_to_proto)
            .map_err(store_err);
        observe(&self.metrics, Resource::Item, Operation::Update, result)
    }

    #[instrument(skip_all)]
    async fn delete_item(
        &self,
        req: Request<flagbase::DeleteItemRequest>,
    ) -> Result<Response<flagbase::DeleteItemResponse>, Status> {
        let r = req.into_inner();
        let result = self
            .items
            .delete(&r.id)
            .map(|()| flagbase::DeleteItemResponse { success: true })
            .map_err(store_err);
        observe(&self.metrics, Resource::Item, Operation::Delete, result)
    }
}

// ── FeatureServer ─────────────────────────────────────────────────────────────

/// `flagbase.FeatureService` backed by a [`FeatureRepository`].
pub struct FeatureServer {
    features: FeatureRepository,
    metrics: Arc<OperationMetrics>,
}

impl FeatureServer {
    pub fn new(features: FeatureRepository, metrics: Arc<OperationMetrics>) -> Self {
        Self { features, metrics }
    }

    /// Wrap this server in the tonic-generated [`FeatureServiceServer`].
    pub fn into_service(self) -> FeatureServiceServer<Self> {
        FeatureServiceServer::new(self)
    }

    fn create(&self, r: flagbase::CreateFeatureRequest) -> Result<flagbase::Feature, Status> {
        let input = NewFeature {
            name: r.name,
            value: value_to_json(r.value)?,
            resource_id: r.resource_id,
            active: r.active,
        };
        self.features.create(input).map(feature_to_proto).map_err(store_err)
    }

    fn update(&self, r: flagbase::UpdateFeatureRequest) -> Result<flagbase::Feature, Status> {
        let update = FeatureUpdate {
            name: r.name,
            value: value_to_json(r.value)?,
            resource_id: r.resource_id,
            active: r.active,
        };
        self.features
            .update(&r.id, update)
            .map(feature_to_proto)
            .map_err(store_err)
    }
}

#[tonic::async_trait]
impl FeatureService for FeatureServer {
    #[instrument(skip_all)]
    async fn create_feature(
        &self,
        req: Request<flagbase::CreateFeatureRequest>,
    ) -> Result<Response<flagbase::Feature>, Status> {
        let result = self.create(req.into_inner());
        observe(&self.metrics, Resource::Feature, Operation::Create, result)
    }

    #[instrument(skip_all)]
    async fn get_feature(
        &self,
        req: Request<flagbase::GetFeatureRequest>,
    ) -> Result<Response<flagbase::Feature>, Status> {
        let r = req.into_inner();
        let result = self.features.get(&r.id).map(feature_to_proto).map_err(store_err);
        observe(&self.metrics, Resource::Feature, Operation::Get, result)
    }

    #[instrument(skip_all)]
    async fn list_features(
        &self,
        req: Request<flagbase::ListFeaturesRequest>,
    ) -> Result<Response<flagbase::ListFeaturesResponse>, Status> {
        let r = req.into_inner();
        let result = self
            .features
            .list(Some(r.resource_id.as_str()))
            .map(|features| flagbase::ListFeaturesResponse {
                features: features.into_iter().map(feature_to_proto).collect(),
            })
            .map_err(store_err);
        observe(&self.metrics, Resource::Feature, Operation::List, result)
    }

    #[instrument(skip_all)]
    async fn update_feature(
        &self,
        req: Request<flagbase::UpdateFeatureRequest>,
    ) -> Result<Response<flagbase::Feature>, Status> {
        let result = self.update(req.into_inner());
        observe(&self.metrics, Resource::Feature, Operation::Update, result)
    }

    #[instrument(skip_all)]
    async fn delete_feature(
        &self,
        req: Request<flagbase::DeleteFeatureRequest>,
    ) -> Result<Response<flagbase::DeleteFeatureResponse>, Status> {
        let r = req.into_inner();
        let result = self
            .features
            .delete(&r.id)
            .map(|()| flagbase::DeleteFeatureResponse { success: true })
            .map_err(store_err);
        observe(&self.metrics, Resource::Feature, Operation::Delete, result)
    }
}
