use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    /// Unix timestamp in seconds. Checked only at lookup time; there is no
    /// background expiry sweep.
    pub expires_at: i64,
}

/// One shopping-list entry as stored and returned to clients.
///
/// `id` is a UUID assigned on first save and stable across sync rounds.
/// Blob mode stores submitted items verbatim, so `id` can be absent there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "priceA")]
    pub price_a: String,
    #[serde(rename = "priceB")]
    pub price_b: String,
    pub purchased: bool,
}

/// A client-submitted item. Every field except `purchased` may be missing:
/// no id means "new item", no price means the default, and no name marks
/// the entry as malformed (dropped during reconciliation).
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "priceA")]
    pub price_a: Option<String>,
    #[serde(rename = "priceB")]
    pub price_b: Option<String>,
    #[serde(default)]
    pub purchased: bool,
}

/// Price stored when the client omits one.
pub const DEFAULT_PRICE: &str = "R$ 0,00";
