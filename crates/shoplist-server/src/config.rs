use std::env;

/// Which list store strategy the server runs with.
///
/// `Blob` is the single-tenant variant: the whole list lives under one kv
/// key, no sessions involved. `Relational` keeps one row per item scoped to
/// a user and requires a bearer session on the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Blob,
    Relational,
}

impl StoreMode {
    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "blob" | "kv" => StoreMode::Blob,
            _ => StoreMode::Relational,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub sqlite_path: String,
    pub cors_origin: String,
    pub store_mode: StoreMode,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./data/shoplist.db".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            store_mode: StoreMode::parse(
                &env::var("LIST_STORE").unwrap_or_else(|_| "relational".to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_mode() {
        assert_eq!(StoreMode::parse("blob"), StoreMode::Blob);
        assert_eq!(StoreMode::parse("KV"), StoreMode::Blob);
        assert_eq!(StoreMode::parse("relational"), StoreMode::Relational);
        // Unknown values fall back to the relational default
        assert_eq!(StoreMode::parse("postgres"), StoreMode::Relational);
    }
}
