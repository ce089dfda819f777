//! Periodic removal of store-expired links.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use super::invalidator::Invalidator;
use crate::domain::repositories::LinkStore;

/// Deletes expired links and drives them through cache invalidation.
///
/// The sweep is the only path that removes links purely due to time. It runs
/// with no coordination lock; reads of an expired-but-not-yet-swept link
/// already resolve to not-found through the resolver's own expiry check.
pub struct Sweeper {
    store: Arc<dyn LinkStore>,
    invalidator: Arc<Invalidator>,
}

impl Sweeper {
    pub fn new(store: Arc<dyn LinkStore>, invalidator: Arc<Invalidator>) -> Self {
        Self { store, invalidator }
    }

    /// Sweeps all links expired as of `now`, returning the number of slugs
    /// considered.
    ///
    /// Deletions run independently per slug; one failure does not abort the
    /// rest, so the return value does not imply zero partial failures.
    pub async fn sweep(&self, now: i64) -> usize {
        let slugs = match self.store.find_expired(now).await {
            Ok(slugs) => slugs,
            Err(e) => {
                error!(error = %e, "failed to query expired links");
                return 0;
            }
        };

        if slugs.is_empty() {
            return 0;
        }

        let considered = slugs.len();
        let mut failed = 0usize;

        for slug in slugs {
            match self.store.delete(&slug).await {
                Ok(_) => {
                    self.invalidator.invalidate(&slug).await;
                }
                Err(e) => {
                    failed += 1;
                    warn!(slug, error = %e, "failed to sweep expired link");
                }
            }
        }

        info!(considered, failed, "expiration sweep finished");
        considered
    }

    /// Runs the sweep on a fixed schedule until the process exits.
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup is quiet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep(Utc::now().timestamp()).await;
        }
    }
}
