//! Command handling infrastructure.

use event_sink::{EventEnvelope, Version};

use crate::aggregate::{Aggregate, DomainEvent};
use crate::error::DomainError;

/// Result of command execution.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult<E> {
    /// The events that were applied and published.
    pub events: Vec<E>,

    /// The version of the aggregate after the command.
    pub new_version: Version,
}

/// Trait for commands that can be executed against an aggregate.
///
/// Commands represent an intention to perform an action. They may be rejected
/// if the aggregate's current state doesn't allow the action.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the command type name, used for logging and metrics.
    fn command_type(&self) -> &'static str;
}

/// Wraps freshly produced events in envelopes.
///
/// Versions continue from `current`, so the first envelope carries
/// `current + 1`.
pub fn build_envelopes<A: Aggregate>(
    current: Version,
    events: &[A::Event],
) -> Result<Vec<EventEnvelope>, DomainError> {
    let mut envelopes = Vec::with_capacity(events.len());
    let mut version = current;

    for event in events {
        version = version.next();
        let envelope = EventEnvelope::builder()
            .aggregate_type(A::aggregate_type())
            .event_type(event.event_type())
            .version(version)
            .payload(event)?
            .build()?;
        envelopes.push(envelope);
    }

    Ok(envelopes)
}

/// Turns recorded envelopes back into typed events, in order.
pub fn decode_envelopes<A: Aggregate>(
    envelopes: &[EventEnvelope],
) -> Result<Vec<A::Event>, DomainError> {
    envelopes
        .iter()
        .map(|envelope| {
            serde_json::from_value(envelope.payload.clone()).map_err(DomainError::from)
        })
        .collect()
}
