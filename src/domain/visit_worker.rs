//! Background worker draining the visit event queue.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::entities::VisitEvent;
use crate::domain::repositories::LinkStore;
use crate::infrastructure::analytics::AnalyticsSink;

/// Consumes visit events until the channel closes.
///
/// Each event triggers two independent best-effort writes: an analytics
/// append and a visit-counter increment. Failures are logged and swallowed;
/// the redirect that produced the event has long since been answered.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    sink: Arc<dyn AnalyticsSink>,
    store: Arc<dyn LinkStore>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = sink.record(&event).await {
            warn!(slug = %event.slug, error = %e, "analytics write failed");
        }

        if let Err(e) = store.increment_visits(&event.slug).await {
            warn!(slug = %event.slug, error = %e, "visit count increment failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkStore;
    use crate::error::AppError;
    use crate::infrastructure::analytics::MockAnalyticsSink;
    use serde_json::json;

    fn sample_event() -> VisitEvent {
        VisitEvent::new("promo".to_string(), None, Some("DE"), None, 1_700_000_000)
    }

    #[tokio::test]
    async fn test_worker_records_and_increments() {
        let mut sink = MockAnalyticsSink::new();
        let mut store = MockLinkStore::new();

        sink.expect_record()
            .withf(|ev| ev.slug == "promo")
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_increment_visits()
            .withf(|slug| slug == "promo")
            .times(1)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(4);
        tx.send(sample_event()).await.unwrap();
        drop(tx);

        run_visit_worker(rx, Arc::new(sink), Arc::new(store)).await;
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_stop_increment() {
        let mut sink = MockAnalyticsSink::new();
        let mut store = MockLinkStore::new();

        sink.expect_record()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("sink unavailable")));
        store
            .expect_increment_visits()
            .times(1)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(4);
        tx.send(sample_event()).await.unwrap();
        drop(tx);

        run_visit_worker(rx, Arc::new(sink), Arc::new(store)).await;
    }

    #[tokio::test]
    async fn test_increment_failure_is_swallowed() {
        let mut sink = MockAnalyticsSink::new();
        let mut store = MockLinkStore::new();

        sink.expect_record().times(2).returning(|_| Ok(()));
        store
            .expect_increment_visits()
            .times(2)
            .returning(|_| Err(AppError::internal("store down", json!({}))));

        let (tx, rx) = mpsc::channel(4);
        tx.send(sample_event()).await.unwrap();
        tx.send(sample_event()).await.unwrap();
        drop(tx);

        // Both events are processed despite the increment failing.
        run_visit_worker(rx, Arc::new(sink), Arc::new(store)).await;
    }
}
