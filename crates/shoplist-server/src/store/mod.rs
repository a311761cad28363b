mod blob;
mod ordering;
mod reconcile;
mod relational;

pub use blob::BlobListStore;
pub use reconcile::{reconcile, ReconcilePlan};
pub use relational::SqlListStore;

use std::sync::Arc;

use crate::config::{Config, StoreMode};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{Item, ItemInput};

/// Whose list an operation targets. Blob mode runs single-tenant
/// (`Global`); relational mode always works on a resolved user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    User(String),
}

/// The single seam in front of the two storage strategies.
///
/// Both methods operate on the full list: `get` returns everything stored
/// for the scope (empty list if nothing ever was), `save` takes the
/// client's authoritative desired state and converges storage to it,
/// returning the list as persisted.
pub trait ListStore: Send + Sync {
    fn get(&self, scope: &Scope) -> AppResult<Vec<Item>>;
    fn save(&self, scope: &Scope, items: Vec<ItemInput>) -> AppResult<Vec<Item>>;
}

pub fn build(config: &Config, pool: DbPool) -> Arc<dyn ListStore> {
    match config.store_mode {
        StoreMode::Blob => Arc::new(BlobListStore::new(pool)),
        StoreMode::Relational => Arc::new(SqlListStore::new(pool)),
    }
}
