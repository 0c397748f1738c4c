use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A generic named numeric record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Server-generated UUID, immutable.
    pub id: String,
    pub name: String,
    pub value: f64,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

/// A feature flag attached to an external resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    /// Arbitrary JSON document; no shape is enforced.
    pub value: Value,
    /// Owning external resource, used as the list filter.
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeature {
    pub name: String,
    pub value: Value,
    pub resource_id: String,
    /// `None` when the caller did not send the flag at all.
    pub active: Option<bool>,
}

/// Replacement values for every mutable feature field.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureUpdate {
    pub name: String,
    pub value: Value,
    pub resource_id: String,
    pub active: bool,
}
