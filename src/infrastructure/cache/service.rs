//! Fast cache tier trait and error types.

use async_trait::async_trait;

use crate::domain::entities::LinkProjection;

/// Errors that can occur inside a cache tier.
///
/// These are never fatal: the resolver falls through to the next tier and the
/// invalidator logs and moves on.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),
    #[error("cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Outcome of a fast cache lookup across both keyspaces.
#[derive(Debug, Clone, PartialEq)]
pub enum FastCacheLookup {
    /// A cached projection exists. Its `expires_at` still has to be
    /// re-checked by the caller: the provider TTL may outlive the link's
    /// logical expiry.
    Positive(LinkProjection),
    /// The slug was recorded as absent within the negative TTL window.
    Negative,
    Miss,
}

/// The low-latency key-value tier holding denormalized link projections and
/// negative-result markers.
///
/// Positive and negative entries live in two explicit keyspaces and may exist
/// independently; [`FastCacheClient::purge`] removes both.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisFastCache`] - Redis-backed production tier
/// - [`crate::infrastructure::cache::MemoryFastCache`] - in-process fallback and test fake
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FastCacheClient: Send + Sync {
    /// Looks up a slug, consulting the positive keyspace first, then the
    /// negative one.
    async fn lookup(&self, slug: &str) -> CacheResult<FastCacheLookup>;

    /// Stores a positive projection.
    ///
    /// When the link has an expiry, the entry's own eviction time is set to
    /// `expires_at - now` so the provider drops it at logical expiry; the
    /// configured default TTL applies otherwise.
    async fn store(&self, slug: &str, entry: &LinkProjection, now: i64) -> CacheResult<()>;

    /// Records "this slug was absent as of `now`" with the short negative TTL.
    async fn store_negative(&self, slug: &str, now: i64) -> CacheResult<()>;

    /// Removes the positive and negative entries for a slug. Idempotent.
    async fn purge(&self, slug: &str) -> CacheResult<()>;

    /// Reports whether the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
