//! Shared application state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AdminService, Invalidator, Resolver};
use crate::domain::entities::VisitEvent;
use crate::domain::repositories::LinkStore;
use crate::infrastructure::cache::{FastCacheClient, ResponseCacheClient};

/// Everything a handler needs, built once at startup.
///
/// Services and tier clients are passed explicitly; there are no
/// process-wide mutable singletons.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub admin: Arc<AdminService>,
    pub fast_cache: Arc<dyn FastCacheClient>,
    pub visit_tx: mpsc::Sender<VisitEvent>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LinkStore>,
        fast_cache: Arc<dyn FastCacheClient>,
        response_cache: Arc<dyn ResponseCacheClient>,
        invalidator: Arc<Invalidator>,
        visit_tx: mpsc::Sender<VisitEvent>,
        domain: String,
    ) -> Self {
        let resolver = Arc::new(Resolver::new(
            store.clone(),
            fast_cache.clone(),
            response_cache,
            domain,
        ));
        let admin = Arc::new(AdminService::new(store, fast_cache.clone(), invalidator));

        Self {
            resolver,
            admin,
            fast_cache,
            visit_tx,
        }
    }
}
