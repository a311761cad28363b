/// How an intercepted request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Always hit the network; a failure becomes a synthetic 503 and never
    /// stale data. For API endpoints and embedded dashboards.
    NetworkOnly,
    /// Serve the cached copy immediately and refresh it in the background.
    StaleWhileRevalidate,
    /// Serve from cache, falling back to (and populating from) the network.
    CacheFirst,
}

/// URL classification, evaluated in fixed priority order: dynamic patterns
/// win over revalidate patterns, everything else is a static asset.
/// Patterns are plain substrings of the URL.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    dynamic_patterns: Vec<String>,
    revalidate_patterns: Vec<String>,
}

impl CachePolicy {
    pub fn new(dynamic_patterns: Vec<String>, revalidate_patterns: Vec<String>) -> Self {
        Self {
            dynamic_patterns,
            revalidate_patterns,
        }
    }

    pub fn classify(&self, url: &str) -> Strategy {
        if self.dynamic_patterns.iter().any(|p| url.contains(p)) {
            return Strategy::NetworkOnly;
        }
        if self.revalidate_patterns.iter().any(|p| url.contains(p)) {
            return Strategy::StaleWhileRevalidate;
        }
        Strategy::CacheFirst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CachePolicy {
        CachePolicy::new(
            vec!["/api/list".to_string(), "dashboard.example".to_string()],
            vec!["/catalog.json".to_string()],
        )
    }

    #[test]
    fn api_and_embedded_hosts_are_network_only() {
        let p = policy();
        assert_eq!(p.classify("https://app.test/api/list"), Strategy::NetworkOnly);
        assert_eq!(
            p.classify("https://dashboard.example/embed?x=1"),
            Strategy::NetworkOnly
        );
    }

    #[test]
    fn declared_resources_revalidate() {
        assert_eq!(
            policy().classify("https://app.test/catalog.json"),
            Strategy::StaleWhileRevalidate
        );
    }

    #[test]
    fn dynamic_wins_over_revalidate() {
        // A URL matching both kinds of pattern must never serve stale data
        assert_eq!(
            policy().classify("https://app.test/api/list/catalog.json"),
            Strategy::NetworkOnly
        );
    }

    #[test]
    fn everything_else_is_cache_first() {
        assert_eq!(
            policy().classify("https://app.test/static/app.css"),
            Strategy::CacheFirst
        );
    }
}
