//! Request handling: one strategy per classified URL.

use std::sync::Arc;

use crate::fetch::Fetch;
use crate::policy::{CachePolicy, Strategy};
use crate::storage::{CacheStorage, CachedResponse};

pub struct CacheProxy {
    policy: CachePolicy,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetch>,
}

impl CacheProxy {
    pub fn new(policy: CachePolicy, storage: Arc<CacheStorage>, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            policy,
            storage,
            fetcher,
        }
    }

    /// Precache the static asset list into the current generation.
    /// Returns how many assets were stored; failures are logged and
    /// skipped so one unreachable CDN asset doesn't abort the install.
    pub async fn install(&self, urls: &[&str]) -> usize {
        let mut cached = 0;
        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(response) if response.is_cacheable() => {
                    self.storage.put(url, response);
                    cached += 1;
                }
                Ok(response) => {
                    tracing::warn!("Not precaching {url}: status {}", response.status);
                }
                Err(e) => {
                    tracing::warn!("Failed to precache {url}: {e}");
                }
            }
        }
        tracing::info!("Precached {cached}/{} assets", urls.len());
        cached
    }

    /// Drop every cache generation other than the current one.
    pub fn activate(&self) {
        for name in self.storage.activate() {
            tracing::info!("Deleted stale cache {name}");
        }
    }

    /// Serve one intercepted request.
    pub async fn handle(&self, url: &str) -> CachedResponse {
        match self.policy.classify(url) {
            Strategy::NetworkOnly => self.network_only(url).await,
            Strategy::StaleWhileRevalidate => self.stale_while_revalidate(url).await,
            Strategy::CacheFirst => self.cache_first(url).await,
        }
    }

    async fn network_only(&self, url: &str) -> CachedResponse {
        match self.fetcher.fetch(url).await {
            Ok(response) => response,
            Err(e) => {
                // Offline. The caller falls back to its local copy; serving
                // stale data for these paths is what the 503 prevents.
                tracing::debug!("Network-only fetch failed for {url}: {e}");
                CachedResponse::service_unavailable()
            }
        }
    }

    async fn stale_while_revalidate(&self, url: &str) -> CachedResponse {
        if let Some(cached) = self.storage.get(url) {
            let fetcher = Arc::clone(&self.fetcher);
            let storage = Arc::clone(&self.storage);
            let url = url.to_string();
            tokio::spawn(async move {
                match fetcher.fetch(&url).await {
                    Ok(response) if response.is_cacheable() => storage.put(&url, response),
                    Ok(response) => {
                        tracing::debug!("Not revalidating {url}: status {}", response.status)
                    }
                    Err(e) => tracing::debug!("Revalidation of {url} failed: {e}"),
                }
            });
            return cached;
        }
        self.fetch_and_cache(url).await
    }

    async fn cache_first(&self, url: &str) -> CachedResponse {
        if let Some(cached) = self.storage.get(url) {
            return cached;
        }
        self.fetch_and_cache(url).await
    }

    async fn fetch_and_cache(&self, url: &str) -> CachedResponse {
        match self.fetcher.fetch(url).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.storage.put(url, response.clone());
                }
                response
            }
            Err(e) => {
                tracing::debug!("Fetch failed for {url}: {e}");
                CachedResponse::service_unavailable()
            }
        }
    }
}
