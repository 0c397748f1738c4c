//! # flagbase-sdk
//!
//! Rust async client SDK for flagbase.
//!
//! Wraps the tonic-generated `ItemService` and `FeatureService` clients from
//! `flagbase-api` with typed methods that return the domain records from
//! `flagbase-table`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use flagbase_sdk::{CreateFeatureParams, FlagbaseClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = FlagbaseClient::connect("http://127.0.0.1:50051").await?;
//!
//!     let item = client.create_item("Test Item", 29.99).await?;
//!     println!("created item {}", item.id);
//!
//!     let flag = client.create_feature(CreateFeatureParams {
//!         name:        "dark-mode".into(),
//!         value:       serde_json::json!({ "theme": "dark" }),
//!         resource_id: "user-42".into(),
//!         ..Default::default()
//!     }).await?;
//!     println!("flag {} active = {}", flag.id, flag.active);
//!
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::{CreateFeatureParams, FlagbaseClient, UpdateFeatureParams};

// Re-export the record types so callers do not need to depend on
// flagbase-table directly.
pub use flagbase_table::{Feature, Item};
