//! Value objects for the warehouse domain.

use serde::{Deserialize, Serialize};

use super::WarehouseError;

/// Identifier of a registered batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(u32);

impl BatchId {
    /// Creates a batch ID from a raw value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Validates caller input, which must be a positive 32-bit integer.
    pub fn parse(value: i64, field: &'static str) -> Result<Self, WarehouseError> {
        positive(value, field).map(Self)
    }

    /// Returns the underlying value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BatchId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Identifier of a location inside the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u32);

impl LocationId {
    /// Creates a location ID from a raw value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Validates caller input, which must be a positive 32-bit integer.
    pub fn parse(value: i64, field: &'static str) -> Result<Self, WarehouseError> {
        positive(value, field).map(Self)
    }

    /// Returns the underlying value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LocationId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Validates that a caller-supplied number is in `1..=u32::MAX`.
pub(crate) fn positive(value: i64, field: &'static str) -> Result<u32, WarehouseError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or(WarehouseError::OutOfRange { field, value })
}
