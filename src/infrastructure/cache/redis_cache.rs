//! Redis-backed fast cache tier.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::service::{CacheError, CacheResult, FastCacheClient, FastCacheLookup};
use crate::domain::entities::LinkProjection;

const POSITIVE_PREFIX: &str = "L:";
const NEGATIVE_PREFIX: &str = "NEG:";

/// Payload stored under the negative keyspace.
#[derive(Serialize, Deserialize)]
struct NegativeEntry {
    not_found: bool,
    cached_at: i64,
}

/// Redis implementation of the fast cache tier.
///
/// Uses `ConnectionManager` for connection reuse. Projections are stored as
/// JSON under `L:{slug}`, negative markers under `NEG:{slug}`.
pub struct RedisFastCache {
    client: ConnectionManager,
    default_ttl: u64,
    negative_ttl: u64,
}

impl RedisFastCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl: u64, negative_ttl: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl,
            negative_ttl,
        })
    }

    fn positive_key(slug: &str) -> String {
        format!("{}{}", POSITIVE_PREFIX, slug)
    }

    fn negative_key(slug: &str) -> String {
        format!("{}{}", NEGATIVE_PREFIX, slug)
    }
}

#[async_trait]
impl FastCacheClient for RedisFastCache {
    async fn lookup(&self, slug: &str) -> CacheResult<FastCacheLookup> {
        let mut conn = self.client.clone();

        let positive: Option<String> = conn
            .get(Self::positive_key(slug))
            .await
            .map_err(|e| CacheError::Operation(format!("GET failed: {}", e)))?;

        if let Some(payload) = positive {
            match serde_json::from_str::<LinkProjection>(&payload) {
                Ok(entry) => {
                    debug!(slug, "fast cache HIT");
                    return Ok(FastCacheLookup::Positive(entry));
                }
                Err(e) => {
                    // A corrupt entry is treated as a miss; the store fill
                    // will overwrite it.
                    warn!(slug, error = %e, "discarding unparseable cache entry");
                }
            }
        }

        let negative: Option<String> = conn
            .get(Self::negative_key(slug))
            .await
            .map_err(|e| CacheError::Operation(format!("GET failed: {}", e)))?;

        if negative.is_some() {
            debug!(slug, "fast cache negative HIT");
            return Ok(FastCacheLookup::Negative);
        }

        debug!(slug, "fast cache MISS");
        Ok(FastCacheLookup::Miss)
    }

    async fn store(&self, slug: &str, entry: &LinkProjection, now: i64) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let ttl = match entry.expires_at {
            // Auto-evict at logical expiry.
            Some(expires_at) => (expires_at - now).max(1) as u64,
            None => self.default_ttl,
        };

        let payload = serde_json::to_string(entry)
            .map_err(|e| CacheError::Operation(format!("serialize failed: {}", e)))?;

        conn.set_ex::<_, _, ()>(Self::positive_key(slug), payload, ttl)
            .await
            .map_err(|e| CacheError::Operation(format!("SETEX failed: {}", e)))?;

        debug!(slug, ttl, "fast cache SET");
        Ok(())
    }

    async fn store_negative(&self, slug: &str, now: i64) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let payload = serde_json::to_string(&NegativeEntry {
            not_found: true,
            cached_at: now,
        })
        .map_err(|e| CacheError::Operation(format!("serialize failed: {}", e)))?;

        conn.set_ex::<_, _, ()>(Self::negative_key(slug), payload, self.negative_ttl)
            .await
            .map_err(|e| CacheError::Operation(format!("SETEX failed: {}", e)))?;

        debug!(slug, "fast cache negative SET");
        Ok(())
    }

    async fn purge(&self, slug: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let deleted: i32 = conn
            .del(&[Self::positive_key(slug), Self::negative_key(slug)])
            .await
            .map_err(|e| CacheError::Operation(format!("DEL failed: {}", e)))?;

        if deleted > 0 {
            debug!(slug, deleted, "fast cache PURGE");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
