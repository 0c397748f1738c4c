use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::Item;
use crate::store::Store;
use crate::validation::{require_finite, require_non_empty};

const COLUMNS: &str = "id, name, value, created_at";

/// CRUD access to the `items` table.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<Store>,
}

impl ItemRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Inserts a new item with a fresh id and the current time.
    #[instrument(skip(self))]
    pub fn create(&self, name: &str, value: f64) -> Result<Item, StoreError> {
        require_non_empty(name, "name")?;
        require_finite(value, "value")?;

        let id = Uuid::new_v4().to_string();
        let item = self.store.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO items ({COLUMNS}) VALUES (?1, ?2, ?3, ?4) RETURNING {COLUMNS}"
            );
            Ok(conn.query_row(&sql, params![id, name, value, Utc::now()], row_to_item)?)
        })?;

        info!(id = %item.id, "created item");
        Ok(item)
    }

    /// Returns [`StoreError::NotFound`] when no row has this id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Item, StoreError> {
        self.store.with_conn(|conn| {
            let sql = format!("SELECT {COLUMNS} FROM items WHERE id = ?1");
            conn.query_row(&sql, params![id], row_to_item)
                .optional()?
                .ok_or_else(StoreError::item_not_found)
        })
    }

    /// All items in store order. An empty table yields an empty vector.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Item>, StoreError> {
        let items = self.store.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM items"))?;
            let rows = stmt
                .query_map([], row_to_item)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        debug!("Listed {} items", items.len());
        Ok(items)
    }

    /// Overwrites `name` and `value`; `id` and `created_at` are preserved.
    #[instrument(skip(self))]
    pub fn update(&self, id: &str, name: &str, value: f64) -> Result<Item, StoreError> {
        require_non_empty(name, "name")?;
        require_finite(value, "value")?;

        let item = self.store.with_conn(|conn| {
            let sql = format!(
                "UPDATE items SET name = ?1, value = ?2 WHERE id = ?3 RETURNING {COLUMNS}"
            );
            conn.query_row(&sql, params![name, value, id], row_to_item)
                .optional()?
                .ok_or_else(StoreError::item_not_found)
        })?;

        info!(id = %item.id, "updated item");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let deleted = self
            .store
            .with_conn(|conn| Ok(conn.execute("DELETE FROM items WHERE id = ?1", params![id])?))?;
        if deleted == 0 {
            return Err(StoreError::item_not_found());
        }
        info!(id, "deleted item");
        Ok(())
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        value: row.get(2)?,
        created_at: row.get(3)?,
    })
}
