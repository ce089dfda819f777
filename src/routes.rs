//! Route configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    check_slug_handler, create_link_handler, delete_link_handler, get_link_handler,
    health_handler, link_stats_handler, list_links_handler, redirect_handler,
    update_link_handler,
};
use crate::state::AppState;

/// Builds the application router.
///
/// # Endpoints
///
/// - `GET    /health`                        - liveness probe
/// - `POST   /api/admin/links`               - create a link
/// - `GET    /api/admin/links`               - list links
/// - `GET    /api/admin/links/{slug}`        - link details with stats block
/// - `PATCH  /api/admin/links/{slug}`        - partial update
/// - `DELETE /api/admin/links/{slug}`        - delete
/// - `GET    /api/admin/links/{slug}/stats`  - placeholder statistics
/// - `GET    /api/admin/check-slug/{slug}`   - slug availability
/// - `GET    /{slug}`                        - public redirect
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/admin/links",
            post(create_link_handler).get(list_links_handler),
        )
        .route(
            "/api/admin/links/{slug}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/api/admin/links/{slug}/stats", get(link_stats_handler))
        .route("/api/admin/check-slug/{slug}", get(check_slug_handler))
        .route("/{slug}", get(redirect_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
