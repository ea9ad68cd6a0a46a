//! Domain layer for the warehouse inventory.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait for event-sourced entities
//! - DomainEvent trait for domain events
//! - Command trait and envelope encoding for publication
//! - Warehouse aggregate with its commands, events and entities

pub mod aggregate;
pub mod command;
pub mod error;
pub mod warehouse;

pub use aggregate::{Aggregate, DomainEvent};
pub use command::{Command, CommandResult, build_envelopes, decode_envelopes};
pub use error::{DomainError, ErrorKind};
pub use warehouse::{
    AssembleBatch, Batch, BatchId, BatchQuantity, CreateLocation, HistoryError, Location,
    LocationId, LocationRole, LocationRoles, MoveBatch, ReceiveBatch, RegisterBatch, ShipBatch,
    Warehouse, WarehouseCommand, WarehouseError, WarehouseEvent, WarehouseState,
};
