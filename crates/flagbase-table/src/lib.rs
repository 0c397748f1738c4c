//! # flagbase-table
//!
//! SQLite-backed data access for flagbase: the [`Store`] that owns the
//! `items` and `features` tables, and one repository per resource kind.
//! Both the HTTP and the gRPC transports call these repositories, so the
//! validation and not-found rules live here exactly once.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use flagbase_table::{FeatureRepository, ItemRepository, NewFeature, Store};
//!
//! let store = Arc::new(Store::open_memory().unwrap());
//! let items = ItemRepository::new(Arc::clone(&store));
//! let item = items.create("Test Item", 29.99).unwrap();
//! assert_eq!(items.get(&item.id).unwrap(), item);
//!
//! let features = FeatureRepository::new(store);
//! features.create(NewFeature {
//!     name: "dark-mode".into(),
//!     value: serde_json::json!({"variant": "b"}),
//!     resource_id: "tenant-1".into(),
//!     active: None,
//! }).unwrap();
//! ```

pub mod error;
pub mod feature;
pub mod item;
pub mod model;
pub mod schema;
pub mod store;
pub mod validation;
pub mod value;

// Re-exports for convenience.
pub use error::{ErrorKind, StoreError};
pub use feature::{ActivePolicy, FeatureRepository};
pub use item::ItemRepository;
pub use model::{Feature, FeatureUpdate, Item, NewFeature};
pub use store::{Store, StoreOptions};
