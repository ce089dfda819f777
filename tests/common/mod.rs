#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use tokio::sync::mpsc;

use tierlink::application::services::Invalidator;
use tierlink::domain::entities::{Link, LinkChanges, NewLink, VisitEvent};
use tierlink::domain::repositories::LinkStore;
use tierlink::error::AppError;
use tierlink::infrastructure::cache::{
    FastCacheClient, MemoryFastCache, MemoryResponseCache, ResponseCacheClient,
};
use tierlink::routes::app_router;
use tierlink::state::AppState;

pub const TEST_DOMAIN: &str = "go.test";

/// In-memory authoritative store for handler tests.
///
/// Counts `get` calls so tests can assert which requests actually reached the
/// store versus being answered from a cache tier.
pub struct MemoryLinkStore {
    links: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
    get_calls: AtomicUsize,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            get_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `get` has been called since construction.
    pub fn get_call_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Inserts a link directly, bypassing validation.
    pub fn seed(&self, link: Link) {
        self.links.lock().unwrap().insert(link.slug.clone(), link);
    }

    pub fn fetch(&self, slug: &str) -> Option<Link> {
        self.links.lock().unwrap().get(slug).cloned()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn create(&self, new_link: NewLink, now: i64) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.slug) {
            return Err(AppError::conflict(
                "Slug already exists",
                serde_json::json!({ "slug": new_link.slug }),
            ));
        }

        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            slug: new_link.slug.clone(),
            target: new_link.target,
            status: new_link.status,
            expires_at: new_link.expires_at,
            visit_count: 0,
            created_at: now,
            updated_at: now,
        };
        links.insert(new_link.slug, link.clone());
        Ok(link)
    }

    async fn get(&self, slug: &str) -> Result<Option<Link>, AppError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.links.lock().unwrap().get(slug).cloned())
    }

    async fn update(
        &self,
        slug: &str,
        changes: LinkChanges,
        now: i64,
    ) -> Result<Option<Link>, AppError> {
        let mut links = self.links.lock().unwrap();
        let Some(existing) = links.get(slug) else {
            return Ok(None);
        };

        let mut merged = existing.apply(&changes);
        merged.updated_at = now;
        links.insert(slug.to_string(), merged.clone());
        Ok(Some(merged))
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.links.lock().unwrap().remove(slug).is_some())
    }

    async fn list(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let links = self.links.lock().unwrap();
        let mut all: Vec<Link> = links.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        all.truncate(limit as usize);
        Ok(all)
    }

    async fn find_expired(&self, now: i64) -> Result<Vec<String>, AppError> {
        let links = self.links.lock().unwrap();
        Ok(links
            .values()
            .filter(|l| l.expires_at.is_some_and(|e| e <= now))
            .map(|l| l.slug.clone())
            .collect())
    }

    async fn increment_visits(&self, slug: &str) -> Result<(), AppError> {
        if let Some(link) = self.links.lock().unwrap().get_mut(slug) {
            link.visit_count += 1;
        }
        Ok(())
    }
}

/// Fully wired test environment: router over in-memory tiers.
pub struct TestEnv {
    pub server: TestServer,
    pub store: Arc<MemoryLinkStore>,
    pub fast_cache: Arc<MemoryFastCache>,
    pub invalidator: Arc<Invalidator>,
    pub visit_rx: mpsc::Receiver<VisitEvent>,
}

pub fn create_test_env() -> TestEnv {
    let store = Arc::new(MemoryLinkStore::new());
    let fast_cache = Arc::new(MemoryFastCache::new(
        Duration::from_secs(3600),
        Duration::from_secs(60),
    ));
    let response_cache: Arc<dyn ResponseCacheClient> = Arc::new(MemoryResponseCache::new(
        Duration::from_secs(300),
        1_000,
    ));

    let fast_cache_dyn: Arc<dyn FastCacheClient> = fast_cache.clone();
    let invalidator = Arc::new(Invalidator::new(
        fast_cache_dyn.clone(),
        response_cache.clone(),
        TEST_DOMAIN.to_string(),
    ));

    let (visit_tx, visit_rx) = mpsc::channel(100);

    let state = AppState::new(
        store.clone(),
        fast_cache_dyn,
        response_cache,
        invalidator.clone(),
        visit_tx,
        TEST_DOMAIN.to_string(),
    );

    let server = TestServer::new(app_router(state)).unwrap();

    TestEnv {
        server,
        store,
        fast_cache,
        invalidator,
        visit_rx,
    }
}

pub fn sample_link(slug: &str, target: &str, now: i64) -> Link {
    Link {
        id: 0,
        slug: slug.to_string(),
        target: target.to_string(),
        status: 302,
        expires_at: None,
        visit_count: 0,
        created_at: now,
        updated_at: now,
    }
}
