use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EventEnvelope, Result, SinkError,
    sink::{EventSink, validate_events_for_publish},
};

/// In-memory event sink for tests and local tooling.
///
/// Records every published batch in order. Clones share the same recording,
/// so a test can keep one handle while an aggregate owns another.
#[derive(Clone, Default)]
pub struct InMemoryEventSink {
    batches: Arc<RwLock<Vec<Vec<EventEnvelope>>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryEventSink {
    /// Creates a new empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent publish calls fail with [`SinkError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns all published events, in publish order.
    pub async fn events(&self) -> Vec<EventEnvelope> {
        self.batches.read().await.iter().flatten().cloned().collect()
    }

    /// Returns the published batches, one entry per publish call.
    pub async fn batches(&self) -> Vec<Vec<EventEnvelope>> {
        self.batches.read().await.clone()
    }

    /// Returns the published events of one type.
    pub async fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.batches
            .read()
            .await
            .iter()
            .flatten()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns the total number of events published.
    pub async fn event_count(&self) -> usize {
        self.batches.read().await.iter().map(Vec::len).sum()
    }

    /// Returns the number of successful publish calls.
    pub async fn publish_count(&self) -> usize {
        self.batches.read().await.len()
    }

    /// Clears all recorded batches.
    pub async fn clear(&self) {
        self.batches.write().await.clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn publish(&self, events: Vec<EventEnvelope>) -> Result<()> {
        validate_events_for_publish(&events)?;

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable(
                "in-memory sink is marked unavailable".to_string(),
            ));
        }

        tracing::trace!(events = events.len(), "recording published batch");
        self.batches.write().await.push(events);
        Ok(())
    }
}
