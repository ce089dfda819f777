//! Write-path cache busting.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::infrastructure::cache::{FastCacheClient, ResponseCacheClient, response_key};

/// Purges every cache trace of a slug: the fast cache positive entry, the
/// fast cache negative entry, and the edge response entry.
///
/// Invoked after every store-confirmed create, update or delete, and from the
/// expiration sweeper. Idempotent; purging a slug with no cache entries is a
/// no-op. A failed purge is logged but never fails the caller: the fast cache
/// purge is at least issued synchronously, and the edge deletion is
/// best-effort by design (stale data there is bounded by the freshness
/// window).
pub struct Invalidator {
    fast_cache: Arc<dyn FastCacheClient>,
    response_cache: Arc<dyn ResponseCacheClient>,
    domain: String,
}

impl Invalidator {
    pub fn new(
        fast_cache: Arc<dyn FastCacheClient>,
        response_cache: Arc<dyn ResponseCacheClient>,
        domain: String,
    ) -> Self {
        Self {
            fast_cache,
            response_cache,
            domain,
        }
    }

    pub async fn invalidate(&self, slug: &str) {
        if let Err(e) = self.fast_cache.purge(slug).await {
            warn!(slug, error = %e, "fast cache purge failed");
        }

        self.response_cache
            .delete(&response_key(&self.domain, slug))
            .await;

        debug!(slug, "invalidated all cache tiers");
    }
}
