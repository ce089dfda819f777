//! Edge response cache: fully-formed redirect decisions with a short
//! freshness window.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::domain::entities::RedirectTarget;

/// Builds the synthetic request identity a response is cached under.
///
/// The configured domain is used instead of the request's Host header so the
/// key is stable regardless of how the service is addressed.
pub fn response_key(domain: &str, slug: &str) -> String {
    format!("https://{}/{}", domain, slug)
}

/// The response-level cache tier.
///
/// Entries are only ever written for non-expired links and carry their own
/// freshness window, so hits are served verbatim without an expiry re-check.
/// This is the one tier allowed to serve slightly stale data, bounded by that
/// window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseCacheClient: Send + Sync {
    async fn get(&self, key: &str) -> Option<RedirectTarget>;

    async fn put(&self, key: String, response: RedirectTarget);

    /// Best-effort removal; a failure only risks staleness within the
    /// freshness window, never incorrect data beyond it.
    async fn delete(&self, key: &str);
}

/// In-process moka-backed response cache.
///
/// The cache-wide time-to-live is the freshness window; there is no per-entry
/// revalidation.
pub struct MemoryResponseCache {
    cache: Cache<String, RedirectTarget>,
}

impl MemoryResponseCache {
    pub fn new(freshness_window: Duration, max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(freshness_window)
                .max_capacity(max_capacity)
                .build(),
        }
    }
}

#[async_trait]
impl ResponseCacheClient for MemoryResponseCache {
    async fn get(&self, key: &str) -> Option<RedirectTarget> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            debug!(key, "edge cache HIT");
        }
        hit
    }

    async fn put(&self, key: String, response: RedirectTarget) {
        self.cache.insert(key, response).await;
    }

    async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}
