//! Cache tiers: the fast key-value tier and the edge response tier.
//!
//! Both are fail-open. The resolver falls through on a tier error and the
//! invalidator treats purge failures as log-only events.

mod memory_cache;
mod redis_cache;
mod response_cache;
mod service;

pub use memory_cache::MemoryFastCache;
pub use redis_cache::RedisFastCache;
pub use response_cache::{MemoryResponseCache, ResponseCacheClient, response_key};
pub use service::{CacheError, CacheResult, FastCacheClient, FastCacheLookup};

#[cfg(test)]
pub use response_cache::MockResponseCacheClient;
#[cfg(test)]
pub use service::MockFastCacheClient;
