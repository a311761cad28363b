//! Offline-capable request caching for the shopping-list front end.
//!
//! Mirrors a service worker's lifecycle: a [`CacheProxy`] sits between the
//! page and the network, classifies every request URL into a strategy
//! (network-only, stale-while-revalidate, or cache-first), and serves it
//! from a set of versioned cache generations held by [`CacheStorage`].
//! Deploying a new asset bundle bumps the [`CacheVersion`]; activating the
//! proxy then deletes every generation but the current one.

mod fetch;
mod policy;
mod proxy;
mod storage;

pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use policy::{CachePolicy, Strategy};
pub use proxy::CacheProxy;
pub use storage::{CacheStorage, CacheVersion, CachedResponse, ResponseOrigin};
