//! # flagbase-api
//!
//! gRPC transport for flagbase: `ItemService` and `FeatureService` defined in
//! `proto/flagbase.proto`, both backed by the repositories in
//! `flagbase-table`.
//!
//! ## Services
//!
//! | Service          | RPCs                                                         |
//! |------------------|--------------------------------------------------------------|
//! | `ItemService`    | CreateItem / GetItem / ListItems / UpdateItem / DeleteItem   |
//! | `FeatureService` | CreateFeature / GetFeature / ListFeatures / UpdateFeature / DeleteFeature |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flagbase_api::{FeatureServer, ItemServer, OperationMetrics};
//! use flagbase_table::{FeatureRepository, ItemRepository, Store};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(Store::open_memory()?);
//!     let metrics = Arc::new(OperationMetrics::new());
//!     tonic::transport::Server::builder()
//!         .add_service(ItemServer::new(ItemRepository::new(store.clone()), metrics.clone()).into_service())
//!         .add_service(FeatureServer::new(FeatureRepository::new(store), metrics).into_service())
//!         .serve("[::1]:50051".parse()?)
//!         .await?;
//!     Ok(())
//! }
//! ```

// Generated protobuf / tonic code (compiled by build.rs)
#[allow(clippy::all)]
#[allow(clippy::pedantic)]
pub mod proto {
    pub mod flagbase {
        tonic::include_proto!("flagbase");
    }
}

/// Encoded file descriptor set for gRPC server reflection.
pub const FLAGBASE_DESCRIPTOR: &[u8] = tonic::include_file_descriptor_set!("flagbase_descriptor");

pub mod convert;
pub mod metrics;
pub mod server;

pub use metrics::{Operation, OperationMetrics, Resource};
pub use proto::flagbase as pb;
pub use server::{store_err, FeatureServer, ItemServer};
