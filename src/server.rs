//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache tier setup, background worker spawning,
//! and Axum server lifecycle.

use crate::application::services::{Invalidator, Sweeper};
use crate::config::Config;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::analytics::PgAnalyticsSink;
use crate::infrastructure::cache::{
    FastCacheClient, MemoryFastCache, MemoryResponseCache, RedisFastCache, ResponseCacheClient,
};
use crate::infrastructure::persistence::PgLinkStore;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Fast cache tier: Redis, or an in-process map when Redis is unavailable
/// - Edge response cache
/// - Background visit worker and expiration sweeper
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let fast_cache: Arc<dyn FastCacheClient> = if let Some(redis_url) = &config.redis_url {
        match RedisFastCache::connect(
            redis_url,
            config.fast_cache_ttl_seconds,
            config.negative_cache_ttl_seconds,
        )
        .await
        {
            Ok(redis) => {
                tracing::info!("Fast cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
                Arc::new(MemoryFastCache::new(
                    Duration::from_secs(config.fast_cache_ttl_seconds),
                    Duration::from_secs(config.negative_cache_ttl_seconds),
                ))
            }
        }
    } else {
        tracing::info!("Fast cache: in-process (Redis not configured)");
        Arc::new(MemoryFastCache::new(
            Duration::from_secs(config.fast_cache_ttl_seconds),
            Duration::from_secs(config.negative_cache_ttl_seconds),
        ))
    };

    let response_cache: Arc<dyn ResponseCacheClient> = Arc::new(MemoryResponseCache::new(
        Duration::from_secs(config.edge_cache_ttl_seconds),
        config.edge_cache_capacity,
    ));

    let pool_arc = Arc::new(pool);
    let store = Arc::new(PgLinkStore::new(pool_arc.clone()));
    let sink = Arc::new(PgAnalyticsSink::new(pool_arc));

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);
    tokio::spawn(run_visit_worker(visit_rx, sink, store.clone()));
    tracing::info!("Visit worker started");

    let invalidator = Arc::new(Invalidator::new(
        fast_cache.clone(),
        response_cache.clone(),
        config.domain.clone(),
    ));

    let sweeper = Sweeper::new(store.clone(), invalidator.clone());
    tokio::spawn(sweeper.run(Duration::from_secs(config.sweep_interval_seconds)));
    tracing::info!("Expiration sweeper started");

    let state = AppState::new(
        store,
        fast_cache,
        response_cache,
        invalidator,
        visit_tx,
        config.domain.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
