use std::sync::Arc;

use async_trait::async_trait;

use crate::{EventEnvelope, Result, SinkError};

/// Destination for the events produced by an aggregate.
///
/// An aggregate publishes every event produced by one command in a single
/// call, in the order it applied them. Implementations must keep that order
/// and must accept or reject the batch as a whole.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes an ordered, non-empty batch of events.
    async fn publish(&self, events: Vec<EventEnvelope>) -> Result<()>;
}

#[async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    async fn publish(&self, events: Vec<EventEnvelope>) -> Result<()> {
        (**self).publish(events).await
    }
}

/// Validates a batch before it is published.
///
/// A batch must be non-empty, come from a single aggregate type, and carry
/// consecutive versions.
pub fn validate_events_for_publish(events: &[EventEnvelope]) -> Result<()> {
    let Some(first) = events.first() else {
        return Err(SinkError::EmptyBatch);
    };

    let mut expected_version = first.version;
    for event in events.iter().skip(1) {
        if event.aggregate_type != first.aggregate_type {
            return Err(SinkError::MixedAggregateTypes {
                expected: first.aggregate_type.clone(),
                actual: event.aggregate_type.clone(),
            });
        }

        expected_version = expected_version.next();
        if event.version != expected_version {
            return Err(SinkError::NonSequentialVersions {
                expected: expected_version,
                actual: event.version,
            });
        }
    }

    Ok(())
}
