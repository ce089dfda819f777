//! Admin mutation surface: create, list, get, update, delete, slug check.
//!
//! Authorization is an external collaborator's concern; these operations
//! assume the caller is already authorized.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use super::invalidator::Invalidator;
use crate::domain::entities::{Link, LinkChanges, LinkProjection, NewLink};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::infrastructure::cache::FastCacheClient;
use crate::utils::slug::generate_slug;
use crate::utils::validation::{LinkDraft, validate_link, validate_slug};

/// Default HTTP status for new links.
pub const DEFAULT_STATUS: i16 = 302;

/// Server-enforced cap on list sizes, regardless of the requested limit.
pub const LIST_MAX_LIMIT: i64 = 100;

/// Default list size when the caller does not specify one.
pub const LIST_DEFAULT_LIMIT: i64 = 50;

/// Input for [`AdminService::create`].
#[derive(Debug, Clone)]
pub struct CreateLink {
    /// Auto-generated when omitted.
    pub slug: Option<String>,
    pub target: String,
    pub status: Option<i16>,
    pub expires_at: Option<i64>,
}

/// Outcome of a slug availability check.
#[derive(Debug, Clone, PartialEq)]
pub struct SlugAvailability {
    pub available: bool,
    pub reason: Option<&'static str>,
}

/// Orchestrates store mutations and the cache-busting contract.
///
/// Every mutation follows the same shape: validate, write to the store,
/// invalidate all tiers, and (for create/update) re-seed the fast cache with
/// the fresh projection so the next request avoids a store read.
pub struct AdminService {
    store: Arc<dyn LinkStore>,
    fast_cache: Arc<dyn FastCacheClient>,
    invalidator: Arc<Invalidator>,
}

impl AdminService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        fast_cache: Arc<dyn FastCacheClient>,
        invalidator: Arc<Invalidator>,
    ) -> Self {
        Self {
            store,
            fast_cache,
            invalidator,
        }
    }

    /// Creates a link, generating an 8-character slug when none is given.
    ///
    /// Creation bypasses the negative cache entirely: only the store's
    /// uniqueness constraint gates it. A stale negative entry is purged right
    /// after the write so the new link is resolvable immediately.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] with field-level details, or
    /// [`AppError::Conflict`] when the slug exists (including when a
    /// concurrent create won the race).
    pub async fn create(&self, input: CreateLink, now: i64) -> Result<Link, AppError> {
        let slug = input.slug.unwrap_or_else(generate_slug);
        let status = input.status.unwrap_or(DEFAULT_STATUS);

        let draft = LinkDraft {
            slug: &slug,
            target: &input.target,
            status,
            expires_at: input.expires_at,
        };
        let errors = validate_link(&draft, now);
        if !errors.is_empty() {
            return Err(AppError::validation_failed(errors));
        }

        let link = self
            .store
            .create(
                NewLink {
                    slug: slug.clone(),
                    target: input.target,
                    status,
                    expires_at: input.expires_at,
                },
                now,
            )
            .await?;

        self.invalidator.invalidate(&slug).await;
        self.seed_fast_cache(&link, now).await;

        Ok(link)
    }

    /// Lists links, newest first, capped at [`LIST_MAX_LIMIT`].
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<Link>, AppError> {
        let limit = limit
            .unwrap_or(LIST_DEFAULT_LIMIT)
            .clamp(1, LIST_MAX_LIMIT);
        self.store.list(limit).await
    }

    /// Fetches a link by slug.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the slug is absent.
    pub async fn get(&self, slug: &str) -> Result<Link, AppError> {
        self.store.get(slug).await?.ok_or_else(|| {
            AppError::not_found("Link not found", json!({ "slug": slug }))
        })
    }

    /// Partially updates a link.
    ///
    /// Validation runs against the merged record so a partial update cannot
    /// produce an invalid whole. The mutation does not return until
    /// invalidation has been issued; the fast cache is then re-seeded with
    /// the new projection.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the slug is absent,
    /// [`AppError::Validation`] when the merged record is invalid.
    pub async fn update(
        &self,
        slug: &str,
        changes: LinkChanges,
        now: i64,
    ) -> Result<Link, AppError> {
        let existing = self.get(slug).await?;

        let merged = existing.apply(&changes);
        let draft = LinkDraft {
            slug: &merged.slug,
            target: &merged.target,
            status: merged.status,
            expires_at: merged.expires_at,
        };
        let errors = validate_link(&draft, now);
        if !errors.is_empty() {
            return Err(AppError::validation_failed(errors));
        }

        let updated = self
            .store
            .update(slug, changes, now)
            .await?
            .ok_or_else(|| {
                // Deleted between the read and the write.
                AppError::not_found("Link not found", json!({ "slug": slug }))
            })?;

        self.invalidator.invalidate(slug).await;
        self.seed_fast_cache(&updated, now).await;

        Ok(updated)
    }

    /// Deletes a link and purges its projections from every tier.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the slug is absent.
    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        let deleted = self.store.delete(slug).await?;
        if !deleted {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "slug": slug }),
            ));
        }

        self.invalidator.invalidate(slug).await;
        Ok(())
    }

    /// Checks whether a slug could be used for a new link.
    ///
    /// Goes straight to the store: the negative cache never gates creation.
    pub async fn check_slug(&self, slug: &str) -> Result<SlugAvailability, AppError> {
        if validate_slug(slug).is_some() {
            return Ok(SlugAvailability {
                available: false,
                reason: Some("invalid_slug"),
            });
        }

        if self.store.get(slug).await?.is_some() {
            return Ok(SlugAvailability {
                available: false,
                reason: Some("taken"),
            });
        }

        Ok(SlugAvailability {
            available: true,
            reason: None,
        })
    }

    /// Re-seeds the fast cache after a confirmed write. Best-effort: the next
    /// request would fill it from the store anyway.
    async fn seed_fast_cache(&self, link: &Link, now: i64) {
        let projection = LinkProjection::from(link);
        if let Err(e) = self.fast_cache.store(&link.slug, &projection, now).await {
            warn!(slug = %link.slug, error = %e, "failed to re-seed fast cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkStore;
    use crate::infrastructure::cache::{MockFastCacheClient, MockResponseCacheClient};

    const NOW: i64 = 1_700_000_000;

    fn stored_link(slug: &str, target: &str) -> Link {
        Link {
            id: 1,
            slug: slug.to_string(),
            target: target.to_string(),
            status: 302,
            expires_at: None,
            visit_count: 0,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    /// Cache pair that accepts any purge/seed traffic.
    fn permissive_caches() -> (MockFastCacheClient, MockResponseCacheClient) {
        let mut fast = MockFastCacheClient::new();
        fast.expect_purge().returning(|_| Ok(()));
        fast.expect_store().returning(|_, _, _| Ok(()));

        let mut edge = MockResponseCacheClient::new();
        edge.expect_delete().returning(|_| ());

        (fast, edge)
    }

    fn service(store: MockLinkStore) -> AdminService {
        let (fast, edge) = permissive_caches();
        service_with(store, fast, edge)
    }

    fn service_with(
        store: MockLinkStore,
        fast: MockFastCacheClient,
        edge: MockResponseCacheClient,
    ) -> AdminService {
        let fast = Arc::new(fast);
        let edge = Arc::new(edge);
        AdminService::new(
            Arc::new(store),
            fast.clone(),
            Arc::new(Invalidator::new(fast, edge, "go.example.com".to_string())),
        )
    }

    #[tokio::test]
    async fn test_create_generates_eight_char_slug() {
        let mut store = MockLinkStore::new();
        store
            .expect_create()
            .withf(|new_link, _| {
                new_link.slug.len() == 8
                    && new_link.slug.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .times(1)
            .returning(|new_link, now| {
                Ok(Link {
                    id: 1,
                    slug: new_link.slug,
                    target: new_link.target,
                    status: new_link.status,
                    expires_at: new_link.expires_at,
                    visit_count: 0,
                    created_at: now,
                    updated_at: now,
                })
            });

        let link = service(store)
            .create(
                CreateLink {
                    slug: None,
                    target: "https://example.com".to_string(),
                    status: None,
                    expires_at: None,
                },
                NOW,
            )
            .await
            .unwrap();

        assert_eq!(link.slug.len(), 8);
        assert_eq!(link.status, 302);
        assert_eq!(link.visit_count, 0);
        assert_eq!(link.created_at, link.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_past_expiry_before_store_write() {
        let mut store = MockLinkStore::new();
        store.expect_create().times(0);

        let err = service(store)
            .create(
                CreateLink {
                    slug: Some("temp".to_string()),
                    target: "https://example.com".to_string(),
                    status: None,
                    expires_at: Some(NOW - 1),
                },
                NOW,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_surfaces_conflict_from_store() {
        let mut store = MockLinkStore::new();
        store.expect_create().times(1).returning(|_, _| {
            Err(AppError::conflict("Slug already exists", json!({})))
        });

        let err = service(store)
            .create(
                CreateLink {
                    slug: Some("promo".to_string()),
                    target: "https://example.com".to_string(),
                    status: None,
                    expires_at: None,
                },
                NOW,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_purges_stale_negative_entry_and_seeds_cache() {
        let mut store = MockLinkStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|_, _| Ok(stored_link("promo", "https://example.com")));

        let mut fast = MockFastCacheClient::new();
        // A lookup for "promo" before creation may have left a negative
        // marker; creation must clear it.
        fast.expect_purge()
            .withf(|slug| slug == "promo")
            .times(1)
            .returning(|_| Ok(()));
        fast.expect_store()
            .withf(|slug, entry, _| slug == "promo" && entry.target == "https://example.com")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut edge = MockResponseCacheClient::new();
        edge.expect_delete().times(1).returning(|_| ());

        service_with(store, fast, edge)
            .create(
                CreateLink {
                    slug: Some("promo".to_string()),
                    target: "https://example.com".to_string(),
                    status: None,
                    expires_at: None,
                },
                NOW,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_validates_merged_record() {
        let mut store = MockLinkStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(stored_link("promo", "https://example.com"))));
        store.expect_update().times(0);

        // The patch alone looks harmless, but the merged record would carry
        // an invalid status.
        let err = service(store)
            .update(
                "promo",
                LinkChanges {
                    status: Some(418),
                    ..Default::default()
                },
                NOW,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_invalidates_then_reseeds() {
        let mut store = MockLinkStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(stored_link("promo", "https://example.com"))));
        store
            .expect_update()
            .withf(|slug, changes, _| {
                slug == "promo" && changes.target.as_deref() == Some("https://example.org/x")
            })
            .times(1)
            .returning(|_, _, now| {
                let mut link = stored_link("promo", "https://example.org/x");
                link.updated_at = now;
                Ok(Some(link))
            });

        let mut fast = MockFastCacheClient::new();
        fast.expect_purge().times(1).returning(|_| Ok(()));
        fast.expect_store()
            .withf(|_, entry, _| entry.target == "https://example.org/x")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut edge = MockResponseCacheClient::new();
        edge.expect_delete().times(1).returning(|_| ());

        let updated = service_with(store, fast, edge)
            .update(
                "promo",
                LinkChanges {
                    target: Some("https://example.org/x".to_string()),
                    ..Default::default()
                },
                NOW,
            )
            .await
            .unwrap();

        assert_eq!(updated.target, "https://example.org/x");
    }

    #[tokio::test]
    async fn test_update_missing_link_is_not_found() {
        let mut store = MockLinkStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let err = service(store)
            .update("ghost", LinkChanges::default(), NOW)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_purges_caches() {
        let mut store = MockLinkStore::new();
        store
            .expect_delete()
            .withf(|slug| slug == "promo")
            .times(1)
            .returning(|_| Ok(true));

        let mut fast = MockFastCacheClient::new();
        fast.expect_purge()
            .withf(|slug| slug == "promo")
            .times(1)
            .returning(|_| Ok(()));

        let mut edge = MockResponseCacheClient::new();
        edge.expect_delete()
            .withf(|key| key == "https://go.example.com/promo")
            .times(1)
            .returning(|_| ());

        service_with(store, fast, edge).delete("promo").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_link_is_not_found() {
        let mut store = MockLinkStore::new();
        store.expect_delete().times(1).returning(|_| Ok(false));

        let err = service(store).delete("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_caps_requested_limit() {
        let mut store = MockLinkStore::new();
        store
            .expect_list()
            .withf(|limit| *limit == LIST_MAX_LIMIT)
            .times(1)
            .returning(|_| Ok(vec![]));

        service(store).list(Some(10_000)).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_default_limit() {
        let mut store = MockLinkStore::new();
        store
            .expect_list()
            .withf(|limit| *limit == LIST_DEFAULT_LIMIT)
            .times(1)
            .returning(|_| Ok(vec![]));

        service(store).list(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_slug_outcomes() {
        let mut store = MockLinkStore::new();
        store
            .expect_get()
            .withf(|slug| slug == "taken1")
            .returning(|_| Ok(Some(stored_link("taken1", "https://example.com"))));
        store
            .expect_get()
            .withf(|slug| slug == "free1")
            .returning(|_| Ok(None));

        let svc = service(store);

        assert_eq!(
            svc.check_slug("bad slug!").await.unwrap(),
            SlugAvailability {
                available: false,
                reason: Some("invalid_slug")
            }
        );
        assert_eq!(
            svc.check_slug("taken1").await.unwrap(),
            SlugAvailability {
                available: false,
                reason: Some("taken")
            }
        );
        assert_eq!(
            svc.check_slug("free1").await.unwrap(),
            SlugAvailability {
                available: true,
                reason: None
            }
        );
    }
}
