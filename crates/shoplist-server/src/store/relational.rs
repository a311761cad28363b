//! Relational list store: one row per item keyed (id, user_id), converged
//! to the client's submitted list by applying a reconciliation plan inside
//! a single transaction.

use rusqlite::Connection;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemInput};
use crate::store::{ordering, reconcile, ListStore, Scope};

pub struct SqlListStore {
    pool: DbPool,
}

impl SqlListStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn user_id<'a>(scope: &'a Scope) -> AppResult<&'a str> {
        match scope {
            Scope::User(id) => Ok(id),
            // List routes are session-scoped in relational mode; reaching
            // this without a resolved user means the request skipped auth.
            Scope::Global => Err(AppError::Unauthorized),
        }
    }

    fn load(conn: &Connection, user_id: &str) -> AppResult<Vec<Item>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, price_a, price_b, purchased FROM items WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map(rusqlite::params![user_id], |row| {
            Ok(Item {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                price_a: row.get(2)?,
                price_b: row.get(3)?,
                // stored as 0/1; booleans only exist at this boundary
                purchased: row.get::<_, i64>(4)? != 0,
            })
        })?;
        let mut items = rows.collect::<Result<Vec<_>, _>>()?;
        items.sort_by(|a, b| ordering::compare(&a.name, &b.name));
        Ok(items)
    }
}

impl ListStore for SqlListStore {
    fn get(&self, scope: &Scope) -> AppResult<Vec<Item>> {
        let user_id = Self::user_id(scope)?;
        let conn = self.pool.get()?;
        Self::load(&conn, user_id)
    }

    fn save(&self, scope: &Scope, items: Vec<ItemInput>) -> AppResult<Vec<Item>> {
        let user_id = Self::user_id(scope)?;
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let server = Self::load(&tx, user_id)?;
        let plan = reconcile(&items, &server);

        for id in &plan.to_delete {
            tx.execute(
                "DELETE FROM items WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![id, user_id],
            )?;
        }

        for item in &plan.to_upsert {
            // reconcile() assigns an id to every upsert. The conflict guard
            // keeps a client from overwriting another user's row by
            // submitting a foreign id.
            tx.execute(
                "INSERT INTO items (id, user_id, name, price_a, price_b, purchased)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     price_a = excluded.price_a,
                     price_b = excluded.price_b,
                     purchased = excluded.purchased
                 WHERE user_id = excluded.user_id",
                rusqlite::params![
                    item.id,
                    user_id,
                    item.name,
                    item.price_a,
                    item.price_b,
                    item.purchased as i64,
                ],
            )?;
        }

        let merged = Self::load(&tx, user_id)?;
        tx.commit()?;
        Ok(merged)
    }
}
