//! Domain error types.

use event_sink::SinkError;
use thiserror::Error;

use crate::warehouse::{HistoryError, WarehouseError};

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The warehouse rejected a command.
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// An event of the replayed history does not fit the state before it.
    #[error("Corrupt history at event {position}: {source}")]
    CorruptHistory {
        position: usize,
        #[source]
        source: HistoryError,
    },

    /// The sink refused the published events.
    #[error("Event sink error: {0}")]
    Sink(#[from] SinkError),

    /// A previous publish failed; the aggregate must be rebuilt by replay.
    #[error("Aggregate is stale after a failed publish and must be rebuilt from history")]
    StaleAggregate,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad category of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A numeric argument was not positive, or a string was missing or empty.
    InvalidArgument,
    /// A well-known location is missing.
    Configuration,
    /// A referenced batch or location does not exist.
    NotFound,
    /// A name is already in use.
    Conflict,
    /// Not enough stock on the location.
    InsufficientStock,
    /// No identifier is left to assign.
    Exhausted,
    /// A business policy forbids the change.
    PolicyViolation,
    /// The history cannot be replayed.
    CorruptHistory,
    /// Publishing failed, or the aggregate is stale because of it.
    Publication,
    /// An event could not be encoded or decoded.
    Serialization,
}

impl ErrorKind {
    /// Returns a stable code for logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::Configuration => "configuration",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InsufficientStock => "insufficient_stock",
            ErrorKind::Exhausted => "exhausted",
            ErrorKind::PolicyViolation => "policy_violation",
            ErrorKind::CorruptHistory => "corrupt_history",
            ErrorKind::Publication => "publication",
            ErrorKind::Serialization => "serialization",
        }
    }

    /// Returns true if the command was rejected and state is unchanged.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument
                | ErrorKind::Configuration
                | ErrorKind::NotFound
                | ErrorKind::Conflict
                | ErrorKind::InsufficientStock
                | ErrorKind::Exhausted
                | ErrorKind::PolicyViolation
        )
    }

    /// Returns true if the same command can succeed later.
    ///
    /// Insufficient stock clears once more stock arrives; publication
    /// failures clear once the host has recovered. The aggregate itself
    /// never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::InsufficientStock | ErrorKind::Publication)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl DomainError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Warehouse(e) => e.kind(),
            DomainError::CorruptHistory { .. } => ErrorKind::CorruptHistory,
            DomainError::Sink(SinkError::Serialization(_)) => ErrorKind::Serialization,
            DomainError::Sink(_) | DomainError::StaleAggregate => ErrorKind::Publication,
            DomainError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{BatchId, LocationId};

    #[test]
    fn test_permanent_rejection_kinds() {
        let cases = [
            (
                WarehouseError::OutOfRange {
                    field: "quantity",
                    value: 0,
                },
                ErrorKind::InvalidArgument,
            ),
            (
                WarehouseError::EmptyArgument { field: "name" },
                ErrorKind::InvalidArgument,
            ),
            (
                WarehouseError::UnknownLocation(LocationId::new(9)),
                ErrorKind::NotFound,
            ),
            (
                WarehouseError::DuplicateBatchName("Bolts".to_string()),
                ErrorKind::Conflict,
            ),
            (
                WarehouseError::IdentifiersExhausted("location"),
                ErrorKind::Exhausted,
            ),
            (
                WarehouseError::HoldingOverflow {
                    batch_id: BatchId::new(1),
                    holder: "Receive (1)".to_string(),
                    held: u32::MAX,
                    added: 5,
                },
                ErrorKind::InvalidArgument,
            ),
            (
                WarehouseError::PharmaIsolation {
                    batch: "Aspirin (1)".to_string(),
                    location: "Shelf (5)".to_string(),
                },
                ErrorKind::PolicyViolation,
            ),
        ];

        for (error, kind) in cases {
            let error = DomainError::from(error);
            assert_eq!(error.kind(), kind);
            assert!(kind.is_rejection());
            assert!(!kind.is_retryable());
        }
    }

    #[test]
    fn test_insufficient_stock_is_retryable_rejection() {
        let error = DomainError::from(WarehouseError::InsufficientStock {
            batch_id: BatchId::new(1),
            location: "Ship (2)".to_string(),
            requested: 7,
            available: 5,
        });

        assert_eq!(error.kind(), ErrorKind::InsufficientStock);
        assert!(error.kind().is_rejection());
        assert!(error.kind().is_retryable());
    }

    #[test]
    fn test_publication_errors_are_retryable() {
        let error = DomainError::from(SinkError::Unavailable("down".to_string()));
        assert_eq!(error.kind(), ErrorKind::Publication);
        assert!(error.kind().is_retryable());
        assert!(!error.kind().is_rejection());

        assert_eq!(DomainError::StaleAggregate.kind(), ErrorKind::Publication);
    }

    #[test]
    fn test_corrupt_history_keeps_source() {
        let error = DomainError::CorruptHistory {
            position: 3,
            source: HistoryError::DuplicateLocationId(LocationId::new(1)),
        };

        assert_eq!(error.kind(), ErrorKind::CorruptHistory);
        assert_eq!(
            error.to_string(),
            "Corrupt history at event 3: Location 1 is created more than once"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(ErrorKind::InsufficientStock.code(), "insufficient_stock");
        assert_eq!(ErrorKind::PolicyViolation.to_string(), "policy_violation");
    }
}
