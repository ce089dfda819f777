//! Read path across the three tiers.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::entities::{LinkProjection, RedirectTarget};
use crate::domain::repositories::LinkStore;
use crate::infrastructure::cache::{
    FastCacheClient, FastCacheLookup, ResponseCacheClient, response_key,
};

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Redirect(RedirectTarget),
    NotFound,
}

/// Resolves a slug to a redirect decision: edge response cache, then fast
/// cache, then the authoritative store, short-circuiting on the first
/// decisive hit and filling faster tiers on the way back up.
///
/// Never returns an error: the read path favors availability, degrading a
/// store failure to a not-found response.
pub struct Resolver {
    store: Arc<dyn LinkStore>,
    fast_cache: Arc<dyn FastCacheClient>,
    response_cache: Arc<dyn ResponseCacheClient>,
    domain: String,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn LinkStore>,
        fast_cache: Arc<dyn FastCacheClient>,
        response_cache: Arc<dyn ResponseCacheClient>,
        domain: String,
    ) -> Self {
        Self {
            store,
            fast_cache,
            response_cache,
            domain,
        }
    }

    /// Resolves `slug` as of `now`, doing at most one store round trip.
    pub async fn resolve(&self, slug: &str, now: i64) -> Resolution {
        let edge_key = response_key(&self.domain, slug);

        // Tier 1: edge response cache. Entries were only ever written for
        // non-expired links and the freshness window bounds staleness, so the
        // hit is served verbatim with no expiry re-check.
        if let Some(cached) = self.response_cache.get(&edge_key).await {
            return Resolution::Redirect(cached);
        }

        // Tier 2: fast cache, both keyspaces.
        match self.fast_cache.lookup(slug).await {
            Ok(FastCacheLookup::Positive(entry)) => {
                if entry.expires_at.is_some_and(|e| now >= e) {
                    // The provider TTL outlived the logical expiry. Within its
                    // TTL the entry is a firm signal; no store re-validation.
                    debug!(slug, "fast cache entry expired");
                    return Resolution::NotFound;
                }

                let redirect = RedirectTarget::from(&entry);
                self.fill_edge(edge_key, redirect.clone());
                return Resolution::Redirect(redirect);
            }
            Ok(FastCacheLookup::Negative) => {
                debug!(slug, "negative cache HIT");
                return Resolution::NotFound;
            }
            Ok(FastCacheLookup::Miss) => {}
            Err(e) => {
                // Tier unreachable; treat as a miss and fall through.
                warn!(slug, error = %e, "fast cache unavailable");
            }
        }

        // Tier 3: authoritative store.
        let link = match self.store.get(slug).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                if let Err(e) = self.fast_cache.store_negative(slug, now).await {
                    warn!(slug, error = %e, "failed to write negative cache entry");
                }
                return Resolution::NotFound;
            }
            Err(e) => {
                // A redirect service favors availability over surfacing
                // internal failures to end users.
                error!(slug, error = %e, "store lookup failed, degrading to not-found");
                return Resolution::NotFound;
            }
        };

        if link.is_expired(now) {
            // The positive record still exists and will be swept later; no
            // negative entry is written.
            return Resolution::NotFound;
        }

        let projection = LinkProjection::from(&link);
        if let Err(e) = self.fast_cache.store(slug, &projection, now).await {
            warn!(slug, error = %e, "failed to fill fast cache");
        }

        let redirect = RedirectTarget::from(&link);
        self.fill_edge(edge_key, redirect.clone());
        Resolution::Redirect(redirect)
    }

    /// Populates the edge response cache without blocking the response.
    fn fill_edge(&self, key: String, redirect: RedirectTarget) {
        let cache = self.response_cache.clone();
        tokio::spawn(async move {
            cache.put(key, redirect).await;
        });
    }
}
