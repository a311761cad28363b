//! Versioned cache generations.
//!
//! Each deployment owns one named cache (`{prefix}-v{n}`). Responses are
//! written into the current generation only; lookups search every
//! generation still present, the way `caches.match` does, until
//! [`CacheStorage::activate`] prunes the old ones.

use std::collections::HashMap;
use std::sync::RwLock;

/// Monotonic cache generation number. Bumping it is the whole invalidation
/// scheme: no entry-level expiry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheVersion(pub u32);

impl CacheVersion {
    pub fn cache_name(&self, prefix: &str) -> String {
        format!("{prefix}-v{}", self.0)
    }
}

/// Where a response came from, deciding cache eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOrigin {
    SameOrigin,
    Cors,
    /// Cross-origin without CORS headers; passed through but never stored.
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub origin: ResponseOrigin,
}

impl CachedResponse {
    /// Only successful responses the page could legitimately read get
    /// stored.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && matches!(self.origin, ResponseOrigin::SameOrigin | ResponseOrigin::Cors)
    }

    /// The synthetic response returned when a network-only fetch fails;
    /// the page falls back to local storage on seeing it.
    pub fn service_unavailable() -> Self {
        Self {
            status: 503,
            content_type: None,
            body: Vec::new(),
            origin: ResponseOrigin::SameOrigin,
        }
    }
}

pub struct CacheStorage {
    prefix: String,
    current: RwLock<CacheVersion>,
    caches: RwLock<HashMap<String, HashMap<String, CachedResponse>>>,
}

impl CacheStorage {
    pub fn new(prefix: &str, version: CacheVersion) -> Self {
        Self {
            prefix: prefix.to_string(),
            current: RwLock::new(version),
            caches: RwLock::new(HashMap::new()),
        }
    }

    pub fn current_version(&self) -> CacheVersion {
        *self.current.read().unwrap()
    }

    pub fn current_name(&self) -> String {
        self.current_version().cache_name(&self.prefix)
    }

    /// Advance to a newer generation. Versions only move forward; trying to
    /// migrate backwards (or sideways) is refused.
    pub fn migrate(&self, version: CacheVersion) -> bool {
        let mut current = self.current.write().unwrap();
        if version <= *current {
            tracing::warn!(
                "Refusing cache migration from v{} to v{}",
                current.0,
                version.0
            );
            return false;
        }
        *current = version;
        true
    }

    /// Delete every generation whose name is not the current one.
    /// Returns the deleted cache names.
    pub fn activate(&self) -> Vec<String> {
        let keep = self.current_name();
        let mut caches = self.caches.write().unwrap();
        let stale: Vec<String> = caches.keys().filter(|name| **name != keep).cloned().collect();
        for name in &stale {
            caches.remove(name);
        }
        stale
    }

    /// Look a URL up across all generations, current first.
    pub fn get(&self, url: &str) -> Option<CachedResponse> {
        let caches = self.caches.read().unwrap();
        let current = self.current_name();
        if let Some(found) = caches.get(&current).and_then(|c| c.get(url)) {
            return Some(found.clone());
        }
        caches
            .iter()
            .filter(|(name, _)| **name != current)
            .find_map(|(_, cache)| cache.get(url))
            .cloned()
    }

    /// Store a response under the current generation.
    pub fn put(&self, url: &str, response: CachedResponse) {
        let name = self.current_name();
        let mut caches = self.caches.write().unwrap();
        caches
            .entry(name)
            .or_default()
            .insert(url.to_string(), response);
    }

    pub fn cache_names(&self) -> Vec<String> {
        self.caches.read().unwrap().keys().cloned().collect()
    }
}
