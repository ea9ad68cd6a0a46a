//! Warehouse aggregate and related types.

mod commands;
mod entities;
mod events;
mod roles;
mod service;
mod state;
mod value_objects;

pub use commands::*;
pub use entities::{Batch, Location};
pub use events::{
    AddedBatchData, AddedBatchToLocationData, CreatedLocationData, RegisteredBatchData,
    RemovedBatchData, RemovedBatchFromLocationData, WarehouseEvent,
};
pub use roles::{LocationRole, LocationRoles};
pub use service::Warehouse;
pub use state::WarehouseState;
pub use value_objects::{BatchId, LocationId};

use thiserror::Error;

use crate::error::ErrorKind;

/// Reasons a warehouse command is rejected.
///
/// Every variant is detected before any event is built, so a rejected
/// command never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarehouseError {
    /// A numeric argument is zero, negative or too large.
    #[error("{field} must be a positive 32-bit integer, got {value}")]
    OutOfRange { field: &'static str, value: i64 },

    /// A required argument was not supplied.
    #[error("{field} is required")]
    MissingArgument { field: &'static str },

    /// A required string argument is empty.
    #[error("{field} must not be empty")]
    EmptyArgument { field: &'static str },

    /// Multiplying a component's per-unit quantity overflows.
    #[error("{per_unit} x {quantity} units of batch {batch_id} exceeds the maximum quantity")]
    QuantityOverflow {
        batch_id: BatchId,
        per_unit: u32,
        quantity: u32,
    },

    /// Adding the quantity would push a holding past the maximum quantity.
    #[error(
        "Adding {added} units of batch {batch_id} to the {held} held on {holder} exceeds the maximum quantity"
    )]
    HoldingOverflow {
        batch_id: BatchId,
        holder: String,
        held: u32,
        added: u32,
    },

    /// The location playing a well-known role has not been created.
    #[error("No {role} location exists (expected a location named '{name}')")]
    MissingRoleLocation { role: LocationRole, name: String },

    /// A referenced location does not exist.
    #[error("Location {0} does not exist")]
    UnknownLocation(LocationId),

    /// A referenced batch has not been registered.
    #[error("Batch {0} is not registered")]
    UnknownBatch(BatchId),

    /// The location name is already in use.
    #[error("A location named '{0}' already exists")]
    DuplicateLocationName(String),

    /// The batch name is already in use.
    #[error("A batch named '{0}' already exists")]
    DuplicateBatchName(String),

    /// No identifier is left to assign.
    #[error("No {0} identifiers left to assign")]
    IdentifiersExhausted(&'static str),

    /// The location holds less of the batch than requested.
    #[error(
        "Quantity {requested} of batch {batch_id} is not present on {location}. Available quantity is {available}"
    )]
    InsufficientStock {
        batch_id: BatchId,
        location: String,
        requested: u32,
        available: u32,
    },

    /// A pharma batch may only move into an empty location.
    #[error("Moving pharma batch {batch} to non empty location {location} is not allowed")]
    PharmaIsolation { batch: String, location: String },
}

impl WarehouseError {
    /// Returns the category of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WarehouseError::OutOfRange { .. }
            | WarehouseError::MissingArgument { .. }
            | WarehouseError::EmptyArgument { .. }
            | WarehouseError::QuantityOverflow { .. }
            | WarehouseError::HoldingOverflow { .. } => ErrorKind::InvalidArgument,
            WarehouseError::MissingRoleLocation { .. } => ErrorKind::Configuration,
            WarehouseError::UnknownLocation(_) | WarehouseError::UnknownBatch(_) => {
                ErrorKind::NotFound
            }
            WarehouseError::DuplicateLocationName(_) | WarehouseError::DuplicateBatchName(_) => {
                ErrorKind::Conflict
            }
            WarehouseError::IdentifiersExhausted(_) => ErrorKind::Exhausted,
            WarehouseError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            WarehouseError::PharmaIsolation { .. } => ErrorKind::PolicyViolation,
        }
    }
}

/// Reasons a historical event cannot be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A location id is created twice.
    #[error("Location {0} is created more than once")]
    DuplicateLocationId(LocationId),

    /// Two locations are created with the same name.
    #[error("Location name '{0}' is used more than once")]
    DuplicateLocationName(String),

    /// A batch id is registered twice.
    #[error("Batch {0} is registered more than once")]
    DuplicateBatchId(BatchId),

    /// Two batches are registered with the same name.
    #[error("Batch name '{0}' is used more than once")]
    DuplicateBatchName(String),

    /// An event refers to a location that was never created.
    #[error("{event_type} refers to location {location_id}, which was never created")]
    UnknownLocation {
        location_id: LocationId,
        event_type: &'static str,
    },
}
