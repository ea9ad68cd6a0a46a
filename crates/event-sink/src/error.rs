use thiserror::Error;

use crate::Version;

/// Errors that can occur when handing events to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// A publish call carried no events.
    #[error("Cannot publish an empty event batch")]
    EmptyBatch,

    /// Envelopes in one batch belong to different aggregate types.
    #[error(
        "All events in a batch must have the same aggregate type: expected {expected}, found {actual}"
    )]
    MixedAggregateTypes { expected: String, actual: String },

    /// Envelope versions in one batch are not consecutive.
    #[error("Event versions must be sequential: expected {expected}, found {actual}")]
    NonSequentialVersions { expected: Version, actual: Version },

    /// An envelope was built without one of its required fields.
    #[error("Event envelope is missing required field '{0}'")]
    IncompleteEnvelope(&'static str),

    /// The sink could not accept the batch.
    #[error("Event sink unavailable: {0}")]
    Unavailable(String),

    /// Writing to the underlying transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for event sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
