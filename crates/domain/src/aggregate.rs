//! Core aggregate and domain event traits.

use event_sink::Version;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent:
    Serialize + DeserializeOwned + Send + Sync + Clone + std::fmt::Debug
{
    /// Returns the event type name.
    ///
    /// This is used as the envelope's event type when publishing.
    fn event_type(&self) -> &'static str;
}

/// Trait for aggregates in an event-sourced system.
///
/// In event sourcing, aggregates:
/// - Are rebuilt by replaying events
/// - Generate events from commands
/// - Apply events to update state (pure, deterministic)
pub trait Aggregate: Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The commands this aggregate accepts.
    type Command;

    /// Why a command was rejected.
    type Error: std::error::Error + Send + Sync;

    /// Why a historical event cannot be applied to the current state.
    type HistoryError: std::error::Error + Send + Sync;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the current version of the aggregate.
    ///
    /// Version starts at 0 for a new aggregate and increments with each event.
    fn version(&self) -> Version;

    /// Validates a command against the current state and returns the events
    /// that record it.
    ///
    /// Must not mutate state. An `Ok` result is never empty.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Checks that a historical event fits the current state.
    ///
    /// Events produced by [`Aggregate::handle`] always pass. A failure means
    /// the history is corrupted or was written by someone else.
    fn check(&self, event: &Self::Event) -> Result<(), Self::HistoryError>;

    /// Applies an event to the aggregate, updating its state.
    ///
    /// This method must be pure and deterministic:
    /// - Given the same state and event, it must always produce the same new state
    /// - It must not have side effects
    /// - It must not fail (events represent facts that have happened)
    fn apply(&mut self, event: Self::Event);

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}
