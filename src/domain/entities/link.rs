//! Link entity: the authoritative record behind a short slug.

use serde::{Deserialize, Serialize};

/// A short link as stored in the authoritative store.
///
/// Cached copies of this record exist in the fast cache and the edge response
/// cache, but those are derived projections; the store owns the lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub target: String,
    /// HTTP redirect status: 301, 302, 307 or 308.
    pub status: i16,
    /// Unix timestamp after which the link must never be served. `None` means
    /// the link never expires.
    pub expires_at: Option<i64>,
    /// Eventually consistent visit counter, incremented off the request path.
    pub visit_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Link {
    /// Returns true once wall-clock time has reached `expires_at`.
    ///
    /// A link is expired the instant `now >= expires_at`, regardless of any
    /// cache tier's own TTL.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Applies a partial update, returning the merged record.
    ///
    /// Unspecified fields are left untouched. Used to validate the whole
    /// record before the store mutation runs.
    pub fn apply(&self, changes: &LinkChanges) -> Link {
        let mut merged = self.clone();
        if let Some(target) = &changes.target {
            merged.target = target.clone();
        }
        if let Some(status) = changes.status {
            merged.status = status;
        }
        if let Some(expires_at) = changes.expires_at {
            merged.expires_at = expires_at;
        }
        merged
    }
}

/// Input for creating a link. Timestamps and the visit counter are set by the
/// store on write.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub target: String,
    pub status: i16,
    pub expires_at: Option<i64>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. For `expires_at`, `Some(None)` clears the
/// expiry and `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default)]
pub struct LinkChanges {
    pub target: Option<String>,
    pub status: Option<i16>,
    pub expires_at: Option<Option<i64>>,
}

impl LinkChanges {
    /// True when the patch would not modify anything.
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.status.is_none() && self.expires_at.is_none()
    }
}

/// Denormalized projection of a link held by the fast cache tier.
///
/// Carries `expires_at` so a hit can be re-checked against the link's logical
/// expiry even when the cache provider's own TTL has not lapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkProjection {
    pub target: String,
    pub status: i16,
    pub expires_at: Option<i64>,
}

impl From<&Link> for LinkProjection {
    fn from(link: &Link) -> Self {
        Self {
            target: link.target.clone(),
            status: link.status,
            expires_at: link.expires_at,
        }
    }
}

/// A fully-formed redirect decision, as held by the edge response cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectTarget {
    pub target: String,
    pub status: i16,
}

impl From<&LinkProjection> for RedirectTarget {
    fn from(entry: &LinkProjection) -> Self {
        Self {
            target: entry.target.clone(),
            status: entry.status,
        }
    }
}

impl From<&Link> for RedirectTarget {
    fn from(link: &Link) -> Self {
        Self {
            target: link.target.clone(),
            status: link.status,
        }
    }
}
