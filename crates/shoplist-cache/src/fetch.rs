use async_trait::async_trait;

use crate::storage::{CachedResponse, ResponseOrigin};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network unavailable: {0}")]
    Network(String),
}

/// The network seam. The proxy never talks to the network directly so
/// tests can simulate going offline.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, FetchError>;
}

/// Real fetcher backed by reqwest. `origin` is the app's own base URL
/// (scheme + host); responses from anywhere else count as CORS only when
/// the server says so, opaque otherwise.
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: String,
}

impl HttpFetcher {
    pub fn new(origin: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let origin = if url.starts_with(&self.origin) {
            ResponseOrigin::SameOrigin
        } else if response
            .headers()
            .contains_key(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN)
        {
            ResponseOrigin::Cors
        } else {
            ResponseOrigin::Opaque
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();

        Ok(CachedResponse {
            status,
            content_type,
            body,
            origin,
        })
    }
}
