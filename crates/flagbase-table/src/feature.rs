use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Feature, FeatureUpdate, NewFeature};
use crate::store::Store;
use crate::validation::require_feature_fields;
use crate::value::{decode_value, encode_value};

const COLUMNS: &str = "id, name, value, resource_id, active, created_at";

/// How `active` is chosen when a feature is created.
///
/// Callers that decode a plain boolean cannot tell "omitted" from "false",
/// so historically every new feature was stored as active. `ForceOnCreate`
/// keeps that behaviour; `Honor` stores an explicit `false` as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivePolicy {
    /// `false` or omitted both become `true`.
    #[default]
    ForceOnCreate,
    /// Only an omitted flag defaults to `true`.
    Honor,
}

impl ActivePolicy {
    pub fn resolve(self, requested: Option<bool>) -> bool {
        match (self, requested) {
            (ActivePolicy::ForceOnCreate, _) => true,
            (ActivePolicy::Honor, Some(active)) => active,
            (ActivePolicy::Honor, None) => true,
        }
    }
}

/// CRUD access to the `features` table, including value serialization.
#[derive(Clone)]
pub struct FeatureRepository {
    store: Arc<Store>,
    policy: ActivePolicy,
}

impl FeatureRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_policy(store, ActivePolicy::default())
    }

    pub fn with_policy(store: Arc<Store>, policy: ActivePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> ActivePolicy {
        self.policy
    }

    #[instrument(skip_all, fields(name = %input.name, resource_id = %input.resource_id))]
    pub fn create(&self, input: NewFeature) -> Result<Feature, StoreError> {
        require_feature_fields(&input.name, &input.resource_id)?;

        let active = self.policy.resolve(input.active);
        if input.active == Some(false) && active {
            warn!("feature requested inactive; stored as active under ForceOnCreate policy");
        }

        let id = Uuid::new_v4().to_string();
        let value = encode_value(&input.value)?;
        let row = self.store.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO features ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {COLUMNS}"
            );
            Ok(conn.query_row(
                &sql,
                params![id, input.name, value, input.resource_id, active, Utc::now()],
                FeatureRow::from_row,
            )?)
        })?;

        let feature = row.into_feature()?;
        info!(id = %feature.id, active = feature.active, "created feature");
        Ok(feature)
    }

    /// Returns [`StoreError::NotFound`] when no row has this id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Feature, StoreError> {
        self.store
            .with_conn(|conn| {
                let sql = format!("SELECT {COLUMNS} FROM features WHERE id = ?1");
                conn.query_row(&sql, params![id], FeatureRow::from_row)
                    .optional()?
                    .ok_or_else(StoreError::feature_not_found)
            })?
            .into_feature()
    }

    /// Lists features, restricted to one `resource_id` when the filter is a
    /// non-empty string. No match yields an empty vector.
    #[instrument(skip(self))]
    pub fn list(&self, resource_id: Option<&str>) -> Result<Vec<Feature>, StoreError> {
        let filter = resource_id.filter(|r| !r.is_empty());
        let rows = self.store.with_conn(|conn| {
            let rows = match filter {
                Some(resource_id) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {COLUMNS} FROM features WHERE resource_id = ?1"
                    ))?;
                    let rows = stmt
                        .query_map(params![resource_id], FeatureRow::from_row)?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                }
                None => {
                    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM features"))?;
                    let rows = stmt
                        .query_map([], FeatureRow::from_row)?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                }
            };
            Ok(rows)
        })?;

        debug!("Listed {} features", rows.len());
        rows.into_iter().map(FeatureRow::into_feature).collect()
    }

    /// Overwrites every mutable field; `id` and `created_at` are preserved.
    #[instrument(skip(self, update), fields(name = %update.name, resource_id = %update.resource_id))]
    pub fn update(&self, id: &str, update: FeatureUpdate) -> Result<Feature, StoreError> {
        require_feature_fields(&update.name, &update.resource_id)?;

        let value = encode_value(&update.value)?;
        let feature = self
            .store
            .with_conn(|conn| {
                let sql = format!(
                    "UPDATE features SET name = ?1, value = ?2, resource_id = ?3, active = ?4 \
                     WHERE id = ?5 RETURNING {COLUMNS}"
                );
                conn.query_row(
                    &sql,
                    params![update.name, value, update.resource_id, update.active, id],
                    FeatureRow::from_row,
                )
                .optional()?
                .ok_or_else(StoreError::feature_not_found)
            })?
            .into_feature()?;

        info!(id = %feature.id, "updated feature");
        Ok(feature)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let deleted = self.store.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM features WHERE id = ?1", params![id])?)
        })?;
        if deleted == 0 {
            return Err(StoreError::feature_not_found());
        }
        info!(id, "deleted feature");
        Ok(())
    }
}

/// A `features` row before its value text is parsed.
struct FeatureRow {
    id: String,
    name: String,
    value: String,
    resource_id: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl FeatureRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            value: row.get(2)?,
            resource_id: row.get(3)?,
            active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_feature(self) -> Result<Feature, StoreError> {
        Ok(Feature {
            value: decode_value(&self.value)?,
            id: self.id,
            name: self.name,
            resource_id: self.resource_id,
            active: self.active,
            created_at: self.created_at,
        })
    }
}
