//! Text encoding of feature values.
//!
//! A feature value is any JSON document. It is stored as its compact
//! serialized text and parsed back on every read, so a value keeps its JSON
//! type (string, number, boolean, object, array or null) across a round trip.

use serde_json::Value;

use crate::error::StoreError;

/// Serialize a value for the `features.value` column.
pub fn encode_value(value: &Value) -> Result<String, StoreError> {
    serde_json::to_string(value)
        .map_err(|e| StoreError::Serialization(format!("failed to marshal value: {e}")))
}

/// Parse a stored `features.value` column back into a JSON value.
pub fn decode_value(text: &str) -> Result<Value, StoreError> {
    serde_json::from_str(text)
        .map_err(|e| StoreError::Serialization(format!("failed to unmarshal value: {e}")))
}
