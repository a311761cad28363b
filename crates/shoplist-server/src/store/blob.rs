//! Blob-mode list store: the whole list serialized as one JSON value under
//! a single kv key. No ids are tracked; every save replaces the list
//! wholesale and the last writer wins.

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemInput, DEFAULT_PRICE};
use crate::store::{ordering, ListStore, Scope};

const LIST_KEY: &str = "shopping_list";

pub struct BlobListStore {
    pool: DbPool,
}

impl BlobListStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn key(scope: &Scope) -> String {
        match scope {
            Scope::Global => LIST_KEY.to_string(),
            Scope::User(id) => format!("{LIST_KEY}:{id}"),
        }
    }
}

impl ListStore for BlobListStore {
    fn get(&self, scope: &Scope) -> AppResult<Vec<Item>> {
        let conn = self.pool.get()?;
        let stored = match conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            rusqlite::params![Self::key(scope)],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => value,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Database(e)),
        };

        serde_json::from_str(&stored)
            .map_err(|e| AppError::Internal(format!("Stored list is not valid JSON: {e}")))
    }

    fn save(&self, scope: &Scope, items: Vec<ItemInput>) -> AppResult<Vec<Item>> {
        // Reinserted verbatim: ids (if any) pass through untouched, only
        // missing prices are filled in and the order normalized.
        let mut list: Vec<Item> = items
            .into_iter()
            .map(|input| Item {
                id: input.id,
                name: input.name.unwrap_or_default(),
                price_a: input.price_a.unwrap_or_else(|| DEFAULT_PRICE.to_string()),
                price_b: input.price_b.unwrap_or_else(|| DEFAULT_PRICE.to_string()),
                purchased: input.purchased,
            })
            .collect();
        list.sort_by(|a, b| ordering::compare(&a.name, &b.name));

        let value = serde_json::to_string(&list)
            .map_err(|e| AppError::Internal(format!("Failed to serialize list: {e}")))?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![Self::key(scope), value],
        )?;

        Ok(list)
    }
}
