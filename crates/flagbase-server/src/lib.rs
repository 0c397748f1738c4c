//! # flagbase-server
//!
//! Process wiring for flagbase: environment [`config`], the HTTP/JSON
//! transport in [`rest`], and [`build_state`], which opens the store and
//! constructs the repositories shared by the HTTP and gRPC listeners.

pub mod config;
pub mod rest;

use std::sync::Arc;

use flagbase_api::OperationMetrics;
use flagbase_table::{FeatureRepository, ItemRepository, Store, StoreError};
use tracing::info;

use crate::config::Config;
use crate::rest::AppState;

/// Open the configured store and build the shared application state.
pub fn build_state(config: &Config) -> Result<AppState, StoreError> {
    let store = Arc::new(Store::open(&config.db_path, &config.store_options())?);
    info!(path = %config.db_path, tables = ?store.table_names()?, "store ready");
    Ok(state_from_store(store, config))
}

/// Build the application state around an already-open store.
pub fn state_from_store(store: Arc<Store>, config: &Config) -> AppState {
    AppState {
        items: ItemRepository::new(Arc::clone(&store)),
        features: FeatureRepository::with_policy(store, config.active_policy()),
        metrics: Arc::new(OperationMetrics::new()),
    }
}
