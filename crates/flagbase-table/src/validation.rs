//! Presence checks shared by both repositories.
//!
//! Every `require_*` function returns `Ok(())` on success or a
//! [`StoreError::InvalidInput`] naming the violated constraint.
//!
//! | Field         | Constraint        |
//! |---------------|-------------------|
//! | `name`        | non-empty         |
//! | `resource_id` | non-empty         |
//! | item `value`  | finite            |

use crate::error::StoreError;

/// Reject an empty string field.
pub fn require_non_empty(value: &str, field: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

/// Reject NaN and infinities, which SQLite cannot store in a REAL column.
pub fn require_finite(value: f64, field: &str) -> Result<(), StoreError> {
    if !value.is_finite() {
        return Err(StoreError::InvalidInput(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Both feature fields are checked together so the caller sees one message.
pub fn require_feature_fields(name: &str, resource_id: &str) -> Result<(), StoreError> {
    if name.is_empty() || resource_id.is_empty() {
        return Err(StoreError::InvalidInput(
            "name and resource_id are required".into(),
        ));
    }
    Ok(())
}
