//! PostgreSQL-backed analytics sink.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::AnalyticsSink;
use crate::domain::entities::VisitEvent;

/// Appends visit events to the `link_visits` table.
///
/// Lives in the same database as the link store but is a separate concern:
/// writes happen only from the visit worker and are never awaited by a
/// request.
pub struct PgAnalyticsSink {
    pool: Arc<PgPool>,
}

impl PgAnalyticsSink {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsSink for PgAnalyticsSink {
    async fn record(&self, event: &VisitEvent) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO link_visits (slug, referrer, country, user_agent, visited_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&event.slug)
        .bind(&event.referrer)
        .bind(&event.country)
        .bind(&event.user_agent)
        .bind(event.visited_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
