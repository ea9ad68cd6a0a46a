//! Warehouse aggregate state.

use std::collections::{BTreeMap, HashMap};

use event_sink::Version;

use crate::aggregate::{Aggregate, DomainEvent};

use super::{
    AssembleBatch, Batch, BatchId, CreateLocation, HistoryError, Location, LocationId,
    LocationRole, LocationRoles, MoveBatch, ReceiveBatch, RegisterBatch, ShipBatch,
    WarehouseCommand, WarehouseError, WarehouseEvent, value_objects::positive,
};

/// State of the warehouse, rebuilt by replaying its events.
///
/// Only [`Aggregate::apply`] mutates it. Command methods validate against the
/// current state and return the events that record the change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarehouseState {
    roles: LocationRoles,

    version: Version,

    /// Warehouse totals. Maintained by AddedBatch/RemovedBatch only.
    quantity_by_batch_id: BTreeMap<BatchId, u32>,

    locations: BTreeMap<LocationId, Location>,

    batches: BTreeMap<BatchId, Batch>,

    location_ids_by_name: HashMap<String, LocationId>,

    batch_ids_by_name: HashMap<String, BatchId>,

    role_locations: HashMap<LocationRole, LocationId>,
}

impl WarehouseState {
    /// Creates an empty state whose well-known locations use the given names.
    pub fn with_roles(roles: LocationRoles) -> Self {
        Self {
            roles,
            ..Self::default()
        }
    }
}

impl Aggregate for WarehouseState {
    type Event = WarehouseEvent;
    type Command = WarehouseCommand;
    type Error = WarehouseError;
    type HistoryError = HistoryError;

    fn aggregate_type() -> &'static str {
        "Warehouse"
    }

    fn version(&self) -> Version {
        self.version
    }

    fn handle(&self, command: &WarehouseCommand) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        match command {
            WarehouseCommand::ReceiveBatch(cmd) => self.receive_batch(cmd),
            WarehouseCommand::ShipBatch(cmd) => self.ship_batch(cmd),
            WarehouseCommand::MoveBatch(cmd) => self.move_batch(cmd),
            WarehouseCommand::AssembleBatch(cmd) => self.assemble_batch(cmd),
            WarehouseCommand::CreateLocation(cmd) => self.create_location(cmd),
            WarehouseCommand::RegisterBatch(cmd) => self.register_batch(cmd),
        }
    }

    fn check(&self, event: &WarehouseEvent) -> Result<(), HistoryError> {
        match event {
            WarehouseEvent::RegisteredBatch(data) => {
                if self.batches.contains_key(&data.batch_id) {
                    return Err(HistoryError::DuplicateBatchId(data.batch_id));
                }
                if self.batch_ids_by_name.contains_key(&data.name) {
                    return Err(HistoryError::DuplicateBatchName(data.name.clone()));
                }
                Ok(())
            }
            WarehouseEvent::CreatedLocation(data) => {
                if self.locations.contains_key(&data.location_id) {
                    return Err(HistoryError::DuplicateLocationId(data.location_id));
                }
                if self.location_ids_by_name.contains_key(&data.name) {
                    return Err(HistoryError::DuplicateLocationName(data.name.clone()));
                }
                Ok(())
            }
            WarehouseEvent::AddedBatchToLocation(data) => {
                self.check_location_exists(data.location_id, "AddedBatchToLocation")
            }
            WarehouseEvent::RemovedBatchFromLocation(data) => {
                self.check_location_exists(data.location_id, "RemovedBatchFromLocation")
            }
            WarehouseEvent::AddedBatch(_) | WarehouseEvent::RemovedBatch(_) => Ok(()),
        }
    }

    fn apply(&mut self, event: WarehouseEvent) {
        tracing::trace!(event_type = event.event_type(), "applying event");

        match event {
            WarehouseEvent::RegisteredBatch(data) => {
                self.batch_ids_by_name.insert(data.name.clone(), data.batch_id);
                self.batches.insert(
                    data.batch_id,
                    Batch::new(data.batch_id, data.name, data.is_pharma),
                );
            }
            WarehouseEvent::CreatedLocation(data) => {
                for role in self.roles.roles_of(&data.name) {
                    self.role_locations.insert(role, data.location_id);
                }
                self.location_ids_by_name
                    .insert(data.name.clone(), data.location_id);
                self.locations
                    .insert(data.location_id, Location::new(data.location_id, data.name));
            }
            WarehouseEvent::AddedBatch(data) => {
                let total = self.quantity_by_batch_id.entry(data.batch_id).or_insert(0);
                *total = total.saturating_add(data.quantity);
            }
            WarehouseEvent::RemovedBatch(data) => {
                self.apply_removed_batch(data.batch_id, data.quantity)
            }
            WarehouseEvent::AddedBatchToLocation(data) => {
                match self.locations.get_mut(&data.location_id) {
                    Some(location) => location.add_batch(data.batch_id, data.quantity),
                    None => tracing::warn!(
                        location_id = %data.location_id,
                        "ignoring addition to unknown location"
                    ),
                }
            }
            WarehouseEvent::RemovedBatchFromLocation(data) => {
                match self.locations.get_mut(&data.location_id) {
                    Some(location) => location.remove_batch(data.batch_id, data.quantity),
                    None => tracing::warn!(
                        location_id = %data.location_id,
                        "ignoring removal from unknown location"
                    ),
                }
            }
        }

        self.version = self.version.next();
    }
}

// Apply event helpers
impl WarehouseState {
    fn check_location_exists(
        &self,
        location_id: LocationId,
        event_type: &'static str,
    ) -> Result<(), HistoryError> {
        if self.locations.contains_key(&location_id) {
            Ok(())
        } else {
            Err(HistoryError::UnknownLocation {
                location_id,
                event_type,
            })
        }
    }

    fn apply_removed_batch(&mut self, batch_id: BatchId, quantity: u32) {
        let total = self.quantity_by_batch_id.get(&batch_id).copied().unwrap_or(0);
        if total > quantity {
            self.quantity_by_batch_id.insert(batch_id, total - quantity);
            return;
        }
        if total < quantity {
            tracing::warn!(
                batch_id = %batch_id,
                total,
                quantity,
                "removed more of a batch than the warehouse holds; clamping total to zero"
            );
        }
        self.quantity_by_batch_id.remove(&batch_id);
    }
}

// Command methods (return events)
impl WarehouseState {
    /// Receives a quantity of a batch on the Receive location.
    pub fn receive_batch(
        &self,
        cmd: &ReceiveBatch,
    ) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        let quantity = positive(cmd.quantity, "quantity")?;
        let batch_id = BatchId::parse(cmd.batch_id, "batch_id")?;
        let receive = self.require_role(LocationRole::Receive)?;
        self.require_total_room(batch_id, 0, quantity)?;
        require_room(receive, batch_id, 0, quantity)?;

        Ok(vec![
            WarehouseEvent::added_batch(batch_id.value(), quantity),
            WarehouseEvent::added_batch_to_location(
                receive.id.value(),
                batch_id.value(),
                quantity,
            ),
        ])
    }

    /// Ships a quantity of a batch from the Ship location.
    pub fn ship_batch(&self, cmd: &ShipBatch) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        let quantity = positive(cmd.quantity, "quantity")?;
        let batch_id = BatchId::parse(cmd.batch_id, "batch_id")?;
        let ship = self.require_role(LocationRole::Ship)?;
        require_stock(ship, batch_id, quantity)?;

        Ok(vec![
            WarehouseEvent::removed_batch_from_location(
                ship.id.value(),
                batch_id.value(),
                quantity,
            ),
            WarehouseEvent::removed_batch(batch_id.value(), quantity),
        ])
    }

    /// Moves a quantity of a batch from one location to another.
    pub fn move_batch(&self, cmd: &MoveBatch) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        let quantity = positive(cmd.quantity, "quantity")?;
        let batch_id = BatchId::parse(cmd.batch_id, "batch_id")?;
        let from_id = LocationId::parse(cmd.from_location_id, "from_location_id")?;
        let to_id = LocationId::parse(cmd.to_location_id, "to_location_id")?;

        let from = self
            .locations
            .get(&from_id)
            .ok_or(WarehouseError::UnknownLocation(from_id))?;
        let to = self
            .locations
            .get(&to_id)
            .ok_or(WarehouseError::UnknownLocation(to_id))?;
        let batch = self
            .batches
            .get(&batch_id)
            .ok_or(WarehouseError::UnknownBatch(batch_id))?;

        require_stock(from, batch_id, quantity)?;

        if batch.is_pharma && !to.is_empty() {
            return Err(WarehouseError::PharmaIsolation {
                batch: batch.to_string(),
                location: to.to_string(),
            });
        }

        if from_id != to_id {
            require_room(to, batch_id, 0, quantity)?;
        }

        Ok(vec![
            WarehouseEvent::removed_batch_from_location(
                from_id.value(),
                batch_id.value(),
                quantity,
            ),
            WarehouseEvent::added_batch_to_location(to_id.value(), batch_id.value(), quantity),
        ])
    }

    /// Assembles a new batch on the Assemble location, consuming its components.
    ///
    /// Components are validated in order and all of them must pass before
    /// any event is built. A batch listed twice must cover both requirements.
    pub fn assemble_batch(
        &self,
        cmd: &AssembleBatch,
    ) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        let quantity = positive(cmd.quantity, "quantity")?;
        let batch_id = BatchId::parse(cmd.batch_id, "batch_id")?;
        let components = cmd
            .from
            .as_ref()
            .ok_or(WarehouseError::MissingArgument { field: "from" })?;
        let assemble = self.require_role(LocationRole::Assemble)?;

        let mut consumed: Vec<(BatchId, u32)> = Vec::with_capacity(components.len());
        let mut required_by_batch: BTreeMap<BatchId, u32> = BTreeMap::new();

        for component in components {
            let component_id = BatchId::parse(component.batch_id, "from.batch_id")?;
            let per_unit = positive(component.quantity, "from.quantity")?;
            let overflow = WarehouseError::QuantityOverflow {
                batch_id: component_id,
                per_unit,
                quantity,
            };
            let required = per_unit.checked_mul(quantity).ok_or(overflow.clone())?;

            let total = required_by_batch.entry(component_id).or_insert(0);
            *total = total.checked_add(required).ok_or(overflow)?;
            require_stock(assemble, component_id, *total)?;

            consumed.push((component_id, required));
        }

        let consumed_new = required_by_batch.get(&batch_id).copied().unwrap_or(0);
        self.require_total_room(batch_id, consumed_new, quantity)?;
        require_room(assemble, batch_id, consumed_new, quantity)?;

        let mut events = Vec::with_capacity(consumed.len() * 2 + 2);
        for (component_id, required) in consumed {
            events.push(WarehouseEvent::removed_batch_from_location(
                assemble.id.value(),
                component_id.value(),
                required,
            ));
            events.push(WarehouseEvent::removed_batch(component_id.value(), required));
        }
        events.push(WarehouseEvent::added_batch(batch_id.value(), quantity));
        events.push(WarehouseEvent::added_batch_to_location(
            assemble.id.value(),
            batch_id.value(),
            quantity,
        ));

        Ok(events)
    }

    /// Creates a location with a new identifier.
    pub fn create_location(
        &self,
        cmd: &CreateLocation,
    ) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        let name = required_name(cmd.name.as_deref())?;
        if self.location_ids_by_name.contains_key(name) {
            return Err(WarehouseError::DuplicateLocationName(name.to_string()));
        }
        let location_id = next_id(self.locations.last_key_value().map(|(id, _)| id.value()))
            .ok_or(WarehouseError::IdentifiersExhausted("location"))?;

        Ok(vec![WarehouseEvent::created_location(location_id, name)])
    }

    /// Registers a batch with a new identifier.
    pub fn register_batch(
        &self,
        cmd: &RegisterBatch,
    ) -> Result<Vec<WarehouseEvent>, WarehouseError> {
        let name = required_name(cmd.name.as_deref())?;
        if self.batch_ids_by_name.contains_key(name) {
            return Err(WarehouseError::DuplicateBatchName(name.to_string()));
        }
        let batch_id = next_id(self.batches.last_key_value().map(|(id, _)| id.value()))
            .ok_or(WarehouseError::IdentifiersExhausted("batch"))?;

        Ok(vec![WarehouseEvent::registered_batch(
            batch_id,
            name,
            cmd.is_pharma,
        )])
    }

    fn require_total_room(
        &self,
        batch_id: BatchId,
        removed: u32,
        added: u32,
    ) -> Result<(), WarehouseError> {
        let held = self.quantity_of_batch(batch_id).saturating_sub(removed);
        match held.checked_add(added) {
            Some(_) => Ok(()),
            None => Err(WarehouseError::HoldingOverflow {
                batch_id,
                holder: "the warehouse".to_string(),
                held,
                added,
            }),
        }
    }

    fn require_role(&self, role: LocationRole) -> Result<&Location, WarehouseError> {
        self.role_location(role)
            .ok_or_else(|| WarehouseError::MissingRoleLocation {
                role,
                name: self.roles.name(role).to_string(),
            })
    }
}

fn require_stock(
    location: &Location,
    batch_id: BatchId,
    requested: u32,
) -> Result<(), WarehouseError> {
    let available = location.quantity_of_batch(batch_id);
    if available < requested {
        return Err(WarehouseError::InsufficientStock {
            batch_id,
            location: location.to_string(),
            requested,
            available,
        });
    }
    Ok(())
}

/// Checks that `location` can take `added` more of a batch after `removed`
/// of it has been taken away.
fn require_room(
    location: &Location,
    batch_id: BatchId,
    removed: u32,
    added: u32,
) -> Result<(), WarehouseError> {
    let held = location.quantity_of_batch(batch_id).saturating_sub(removed);
    match held.checked_add(added) {
        Some(_) => Ok(()),
        None => Err(WarehouseError::HoldingOverflow {
            batch_id,
            holder: location.to_string(),
            held,
            added,
        }),
    }
}

/// Returns the name without surrounding whitespace.
fn required_name(name: Option<&str>) -> Result<&str, WarehouseError> {
    let name = name
        .ok_or(WarehouseError::MissingArgument { field: "name" })?
        .trim();
    if name.is_empty() {
        return Err(WarehouseError::EmptyArgument { field: "name" });
    }
    Ok(name)
}

fn next_id(max: Option<u32>) -> Option<u32> {
    match max {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

// Query methods
impl WarehouseState {
    /// Returns the configured names of the well-known locations.
    pub fn roles(&self) -> &LocationRoles {
        &self.roles
    }

    /// Returns the warehouse total of a batch, or 0.
    pub fn quantity_of_batch(&self, batch_id: BatchId) -> u32 {
        self.quantity_by_batch_id
            .get(&batch_id)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the warehouse totals, ordered by batch ID.
    pub fn stock(&self) -> impl Iterator<Item = (BatchId, u32)> + '_ {
        self.quantity_by_batch_id.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Returns a location by ID.
    pub fn location(&self, location_id: LocationId) -> Option<&Location> {
        self.locations.get(&location_id)
    }

    /// Returns a location by name.
    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        self.location_ids_by_name
            .get(name)
            .and_then(|id| self.locations.get(id))
    }

    /// Returns the location playing a role, if it has been created.
    pub fn role_location(&self, role: LocationRole) -> Option<&Location> {
        self.role_locations
            .get(&role)
            .and_then(|id| self.locations.get(id))
    }

    /// Returns all locations, ordered by ID.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Returns a batch by ID.
    pub fn batch(&self, batch_id: BatchId) -> Option<&Batch> {
        self.batches.get(&batch_id)
    }

    /// Returns a batch by name.
    pub fn batch_by_name(&self, name: &str) -> Option<&Batch> {
        self.batch_ids_by_name
            .get(name)
            .and_then(|id| self.batches.get(id))
    }

    /// Returns all registered batches, ordered by ID.
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }
}
