//! Warehouse domain events.

use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{BatchId, LocationId};

/// Events that can occur on the warehouse aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WarehouseEvent {
    /// A batch was registered.
    RegisteredBatch(RegisteredBatchData),

    /// A location was created.
    CreatedLocation(CreatedLocationData),

    /// The warehouse total of a batch increased.
    AddedBatch(AddedBatchData),

    /// The warehouse total of a batch decreased.
    RemovedBatch(RemovedBatchData),

    /// A quantity of a batch was put on a location.
    AddedBatchToLocation(AddedBatchToLocationData),

    /// A quantity of a batch was taken from a location.
    RemovedBatchFromLocation(RemovedBatchFromLocationData),
}

impl DomainEvent for WarehouseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WarehouseEvent::RegisteredBatch(_) => "RegisteredBatch",
            WarehouseEvent::CreatedLocation(_) => "CreatedLocation",
            WarehouseEvent::AddedBatch(_) => "AddedBatch",
            WarehouseEvent::RemovedBatch(_) => "RemovedBatch",
            WarehouseEvent::AddedBatchToLocation(_) => "AddedBatchToLocation",
            WarehouseEvent::RemovedBatchFromLocation(_) => "RemovedBatchFromLocation",
        }
    }
}

/// Data for RegisteredBatch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredBatchData {
    pub batch_id: BatchId,
    pub name: String,
    #[serde(default)]
    pub is_pharma: bool,
}

/// Data for CreatedLocation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedLocationData {
    pub location_id: LocationId,
    pub name: String,
}

/// Data for AddedBatch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedBatchData {
    pub batch_id: BatchId,
    pub quantity: u32,
}

/// Data for RemovedBatch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedBatchData {
    pub batch_id: BatchId,
    pub quantity: u32,
}

/// Data for AddedBatchToLocation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedBatchToLocationData {
    pub location_id: LocationId,
    pub batch_id: BatchId,
    pub quantity: u32,
}

/// Data for RemovedBatchFromLocation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedBatchFromLocationData {
    pub location_id: LocationId,
    pub batch_id: BatchId,
    pub quantity: u32,
}

// Convenience constructors for events
impl WarehouseEvent {
    /// Creates a RegisteredBatch event.
    pub fn registered_batch(batch_id: u32, name: impl Into<String>, is_pharma: bool) -> Self {
        WarehouseEvent::RegisteredBatch(RegisteredBatchData {
            batch_id: BatchId::new(batch_id),
            name: name.into(),
            is_pharma,
        })
    }

    /// Creates a CreatedLocation event.
    pub fn created_location(location_id: u32, name: impl Into<String>) -> Self {
        WarehouseEvent::CreatedLocation(CreatedLocationData {
            location_id: LocationId::new(location_id),
            name: name.into(),
        })
    }

    /// Creates an AddedBatch event.
    pub fn added_batch(batch_id: u32, quantity: u32) -> Self {
        WarehouseEvent::AddedBatch(AddedBatchData {
            batch_id: BatchId::new(batch_id),
            quantity,
        })
    }

    /// Creates a RemovedBatch event.
    pub fn removed_batch(batch_id: u32, quantity: u32) -> Self {
        WarehouseEvent::RemovedBatch(RemovedBatchData {
            batch_id: BatchId::new(batch_id),
            quantity,
        })
    }

    /// Creates an AddedBatchToLocation event.
    pub fn added_batch_to_location(location_id: u32, batch_id: u32, quantity: u32) -> Self {
        WarehouseEvent::AddedBatchToLocation(AddedBatchToLocationData {
            location_id: LocationId::new(location_id),
            batch_id: BatchId::new(batch_id),
            quantity,
        })
    }

    /// Creates a RemovedBatchFromLocation event.
    pub fn removed_batch_from_location(location_id: u32, batch_id: u32, quantity: u32) -> Self {
        WarehouseEvent::RemovedBatchFromLocation(RemovedBatchFromLocationData {
            location_id: LocationId::new(location_id),
            batch_id: BatchId::new(batch_id),
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let cases = [
            (
                WarehouseEvent::registered_batch(1, "Aspirin", true),
                "RegisteredBatch",
            ),
            (
                WarehouseEvent::created_location(1, "Receive"),
                "CreatedLocation",
            ),
            (WarehouseEvent::added_batch(1, 10), "AddedBatch"),
            (WarehouseEvent::removed_batch(1, 10), "RemovedBatch"),
            (
                WarehouseEvent::added_batch_to_location(1, 1, 10),
                "AddedBatchToLocation",
            ),
            (
                WarehouseEvent::removed_batch_from_location(1, 1, 10),
                "RemovedBatchFromLocation",
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(event.event_type(), expected);
        }
    }

    #[test]
    fn test_events_compare_structurally() {
        assert_eq!(
            WarehouseEvent::added_batch_to_location(1, 2, 3),
            WarehouseEvent::added_batch_to_location(1, 2, 3)
        );
        assert_ne!(
            WarehouseEvent::added_batch_to_location(1, 2, 3),
            WarehouseEvent::removed_batch_from_location(1, 2, 3)
        );
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = WarehouseEvent::added_batch_to_location(2, 1, 5);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "AddedBatchToLocation",
                "data": {"location_id": 2, "batch_id": 1, "quantity": 5}
            })
        );
    }

    #[test]
    fn test_registered_batch_defaults_to_non_pharma() {
        let event: WarehouseEvent = serde_json::from_value(serde_json::json!({
            "type": "RegisteredBatch",
            "data": {"batch_id": 4, "name": "Bolts"}
        }))
        .unwrap();

        assert_eq!(event, WarehouseEvent::registered_batch(4, "Bolts", false));
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let result: Result<WarehouseEvent, _> = serde_json::from_value(serde_json::json!({
            "type": "DeletedLocation",
            "data": {"location_id": 1}
        }));
        assert!(result.is_err());
    }
}
