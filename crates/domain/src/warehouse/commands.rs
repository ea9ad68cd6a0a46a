//! Warehouse commands.
//!
//! Commands carry caller input as received. Numbers are validated by the
//! aggregate, so out-of-range values are representable and rejected there.

use serde::{Deserialize, Serialize};

use crate::command::Command;

use super::WarehouseState;

/// Command to receive a quantity of a batch on the Receive location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveBatch {
    pub batch_id: i64,
    pub quantity: i64,
}

impl ReceiveBatch {
    /// Creates a new ReceiveBatch command.
    pub fn new(batch_id: i64, quantity: i64) -> Self {
        Self { batch_id, quantity }
    }
}

/// Command to ship a quantity of a batch from the Ship location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipBatch {
    pub batch_id: i64,
    pub quantity: i64,
}

impl ShipBatch {
    /// Creates a new ShipBatch command.
    pub fn new(batch_id: i64, quantity: i64) -> Self {
        Self { batch_id, quantity }
    }
}

/// Command to move a quantity of a batch between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveBatch {
    pub batch_id: i64,
    pub quantity: i64,
    pub from_location_id: i64,
    pub to_location_id: i64,
}

impl MoveBatch {
    /// Creates a new MoveBatch command.
    pub fn new(batch_id: i64, quantity: i64, from_location_id: i64, to_location_id: i64) -> Self {
        Self {
            batch_id,
            quantity,
            from_location_id,
            to_location_id,
        }
    }
}

/// A component of an assembly: how much of a batch one assembled unit needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchQuantity {
    pub batch_id: i64,
    pub quantity: i64,
}

impl BatchQuantity {
    /// Creates a new component entry.
    pub fn new(batch_id: i64, quantity: i64) -> Self {
        Self { batch_id, quantity }
    }
}

impl From<(i64, i64)> for BatchQuantity {
    fn from((batch_id, quantity): (i64, i64)) -> Self {
        Self { batch_id, quantity }
    }
}

/// Command to assemble a new batch on the Assemble location from components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembleBatch {
    pub batch_id: i64,
    pub quantity: i64,
    /// Components consumed per assembled unit. `None` is rejected.
    pub from: Option<Vec<BatchQuantity>>,
}

impl AssembleBatch {
    /// Creates a new AssembleBatch command.
    pub fn new(
        batch_id: i64,
        quantity: i64,
        from: impl IntoIterator<Item = (i64, i64)>,
    ) -> Self {
        Self {
            batch_id,
            quantity,
            from: Some(from.into_iter().map(BatchQuantity::from).collect()),
        }
    }
}

/// Command to create a named location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocation {
    pub name: Option<String>,
}

impl CreateLocation {
    /// Creates a new CreateLocation command.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Command to register a named batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBatch {
    pub name: Option<String>,
    #[serde(default)]
    pub is_pharma: bool,
}

impl RegisterBatch {
    /// Creates a new RegisterBatch command for a regular batch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_pharma: false,
        }
    }

    /// Creates a new RegisterBatch command for a pharma batch.
    pub fn pharma(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_pharma: true,
        }
    }
}

/// Every command the warehouse accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WarehouseCommand {
    ReceiveBatch(ReceiveBatch),
    ShipBatch(ShipBatch),
    MoveBatch(MoveBatch),
    AssembleBatch(AssembleBatch),
    CreateLocation(CreateLocation),
    RegisterBatch(RegisterBatch),
}

impl Command for WarehouseCommand {
    type Aggregate = WarehouseState;

    fn command_type(&self) -> &'static str {
        match self {
            WarehouseCommand::ReceiveBatch(_) => "ReceiveBatch",
            WarehouseCommand::ShipBatch(_) => "ShipBatch",
            WarehouseCommand::MoveBatch(_) => "MoveBatch",
            WarehouseCommand::AssembleBatch(_) => "AssembleBatch",
            WarehouseCommand::CreateLocation(_) => "CreateLocation",
            WarehouseCommand::RegisterBatch(_) => "RegisterBatch",
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for WarehouseCommand {
                fn from(cmd: $variant) -> Self {
                    WarehouseCommand::$variant(cmd)
                }
            }
        )*
    };
}

impl_from_command!(
    ReceiveBatch,
    ShipBatch,
    MoveBatch,
    AssembleBatch,
    CreateLocation,
    RegisterBatch,
);
