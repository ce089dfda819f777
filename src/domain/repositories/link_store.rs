//! Repository trait for the authoritative link store.

use crate::domain::entities::{Link, LinkChanges, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// The single source of truth for links.
///
/// All cache tiers hold derived projections of records owned by this store.
/// Every operation uses parameterized access; callers pass the current Unix
/// timestamp explicitly so behavior is deterministic under test.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL implementation
/// - In-memory fakes in the integration test suite
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Inserts a new link with `visit_count = 0` and both timestamps set to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the slug already exists (unique
    /// constraint; concurrent creates race here and exactly one wins).
    /// Returns [`AppError::Internal`] on store errors.
    async fn create(&self, new_link: NewLink, now: i64) -> Result<Link, AppError>;

    /// Looks up a link by slug. `Ok(None)` when absent.
    async fn get(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Applies a partial update and bumps `updated_at` to `now`.
    ///
    /// Returns `Ok(None)` when no link matches the slug. Fields not present in
    /// `changes` are left untouched.
    async fn update(
        &self,
        slug: &str,
        changes: LinkChanges,
        now: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Deletes a link. Returns `Ok(true)` when a row was removed.
    async fn delete(&self, slug: &str) -> Result<bool, AppError>;

    /// Lists links, newest first. The caller is responsible for capping `limit`.
    async fn list(&self, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Returns slugs of links whose `expires_at` is non-null and `<= now`.
    ///
    /// Only the expiration sweeper consumes this.
    async fn find_expired(&self, now: i64) -> Result<Vec<String>, AppError>;

    /// Increments the visit counter. Best-effort; invoked only by the visit
    /// worker, never on the request path.
    async fn increment_visits(&self, slug: &str) -> Result<(), AppError>;
}
