//! Event sink abstraction for the warehouse event-sourcing system.
//!
//! Aggregates hand every batch of freshly produced events to an [`EventSink`]
//! wrapped in [`EventEnvelope`]s. How the sink persists or forwards them is
//! its own concern.

pub mod error;
pub mod event;
pub mod memory;
pub mod sink;

pub use error::{Result, SinkError};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version};
pub use memory::InMemoryEventSink;
pub use sink::{EventSink, validate_events_for_publish};
