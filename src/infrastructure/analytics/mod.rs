//! Analytics sink for visit events.

mod pg_sink;

pub use pg_sink::PgAnalyticsSink;

use async_trait::async_trait;

use crate::domain::entities::VisitEvent;

/// Append-only destination for visit events.
///
/// At-least-once semantics: callers retry nothing, under-counting and
/// double-counting are both acceptable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, event: &VisitEvent) -> anyhow::Result<()>;
}
