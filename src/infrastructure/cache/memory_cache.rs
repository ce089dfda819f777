//! In-process fast cache used when Redis is not configured, and as the
//! substitutable fake in tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use super::service::{CacheResult, FastCacheClient, FastCacheLookup};
use crate::domain::entities::LinkProjection;

struct Entry<T> {
    value: T,
    evict_at: Option<Instant>,
}

impl<T> Entry<T> {
    fn is_evicted(&self, at: Instant) -> bool {
        self.evict_at.is_some_and(|deadline| at >= deadline)
    }
}

/// Hash-map fast cache with the same TTL semantics as the Redis tier.
///
/// Positive and negative entries live in separate maps, mirroring the two
/// Redis keyspaces. Eviction is lazy: expired entries are dropped on lookup.
pub struct MemoryFastCache {
    positive: Mutex<HashMap<String, Entry<LinkProjection>>>,
    negative: Mutex<HashMap<String, Entry<i64>>>,
    default_ttl: Duration,
    negative_ttl: Duration,
}

impl MemoryFastCache {
    pub fn new(default_ttl: Duration, negative_ttl: Duration) -> Self {
        debug!("Using in-process fast cache");
        Self {
            positive: Mutex::new(HashMap::new()),
            negative: Mutex::new(HashMap::new()),
            default_ttl,
            negative_ttl,
        }
    }
}

impl Default for MemoryFastCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600), Duration::from_secs(60))
    }
}

#[async_trait]
impl FastCacheClient for MemoryFastCache {
    async fn lookup(&self, slug: &str) -> CacheResult<FastCacheLookup> {
        let at = Instant::now();

        {
            let mut positive = self.positive.lock().expect("cache mutex poisoned");
            match positive.get(slug) {
                Some(entry) if entry.is_evicted(at) => {
                    positive.remove(slug);
                }
                Some(entry) => return Ok(FastCacheLookup::Positive(entry.value.clone())),
                None => {}
            }
        }

        let mut negative = self.negative.lock().expect("cache mutex poisoned");
        match negative.get(slug) {
            Some(entry) if entry.is_evicted(at) => {
                negative.remove(slug);
                Ok(FastCacheLookup::Miss)
            }
            Some(_) => Ok(FastCacheLookup::Negative),
            None => Ok(FastCacheLookup::Miss),
        }
    }

    async fn store(&self, slug: &str, entry: &LinkProjection, now: i64) -> CacheResult<()> {
        let ttl = match entry.expires_at {
            Some(expires_at) => Duration::from_secs((expires_at - now).max(1) as u64),
            None => self.default_ttl,
        };

        self.positive.lock().expect("cache mutex poisoned").insert(
            slug.to_string(),
            Entry {
                value: entry.clone(),
                evict_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn store_negative(&self, slug: &str, now: i64) -> CacheResult<()> {
        self.negative.lock().expect("cache mutex poisoned").insert(
            slug.to_string(),
            Entry {
                value: now,
                evict_at: Some(Instant::now() + self.negative_ttl),
            },
        );
        Ok(())
    }

    async fn purge(&self, slug: &str) -> CacheResult<()> {
        self.positive
            .lock()
            .expect("cache mutex poisoned")
            .remove(slug);
        self.negative
            .lock()
            .expect("cache mutex poisoned")
            .remove(slug);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
