//! Warehouse root: replays history, executes commands and publishes events.

use event_sink::{EventEnvelope, EventSink, Version};

use crate::aggregate::Aggregate;
use crate::command::{Command, CommandResult, build_envelopes, decode_envelopes};
use crate::error::DomainError;

use super::{
    AssembleBatch, CreateLocation, LocationRoles, MoveBatch, ReceiveBatch, RegisterBatch,
    ShipBatch, WarehouseCommand, WarehouseEvent, WarehouseState,
};

/// The warehouse aggregate bound to the sink its events are published to.
///
/// `execute` takes `&mut self`; hosts that share a warehouse between tasks
/// serialize access themselves.
pub struct Warehouse<S: EventSink> {
    state: WarehouseState,
    sink: S,
    stale: bool,
}

impl<S: EventSink> Warehouse<S> {
    /// Creates a warehouse without history.
    pub fn new(sink: S) -> Self {
        Self {
            state: WarehouseState::default(),
            sink,
            stale: false,
        }
    }

    /// Creates a warehouse by replaying its history.
    pub fn from_history(
        sink: S,
        history: impl IntoIterator<Item = WarehouseEvent>,
    ) -> Result<Self, DomainError> {
        Self::with_roles(sink, LocationRoles::default(), history)
    }

    /// Creates a warehouse with custom well-known location names by replaying
    /// its history.
    pub fn with_roles(
        sink: S,
        roles: LocationRoles,
        history: impl IntoIterator<Item = WarehouseEvent>,
    ) -> Result<Self, DomainError> {
        let mut warehouse = Self {
            state: WarehouseState::with_roles(roles),
            sink,
            stale: false,
        };
        warehouse.replay(history)?;
        Ok(warehouse)
    }

    /// Applies more history on top of the current state.
    ///
    /// Every event is checked before it is applied. On failure nothing is
    /// applied and the error carries the zero-based position of the offending
    /// event within `history`.
    pub fn replay(
        &mut self,
        history: impl IntoIterator<Item = WarehouseEvent>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.clone();
        let mut applied: u64 = 0;

        for (position, event) in history.into_iter().enumerate() {
            state
                .check(&event)
                .map_err(|source| DomainError::CorruptHistory { position, source })?;
            state.apply(event);
            applied += 1;
        }

        self.state = state;
        metrics::counter!("warehouse_events_applied_total").increment(applied);
        tracing::debug!(
            events = applied,
            version = %self.state.version(),
            "replayed history"
        );
        Ok(())
    }

    /// Applies history recorded as envelopes, in order.
    pub fn replay_envelopes(&mut self, envelopes: &[EventEnvelope]) -> Result<(), DomainError> {
        let events = decode_envelopes::<WarehouseState>(envelopes)?;
        self.replay(events)
    }

    /// Returns the current state.
    pub fn state(&self) -> &WarehouseState {
        &self.state
    }

    /// Returns the sink events are published to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the number of events applied so far.
    pub fn version(&self) -> Version {
        self.state.version()
    }

    /// Returns true once a publish has failed.
    ///
    /// A stale warehouse rejects every command; rebuild it from the history
    /// the sink actually holds.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Validates a command, applies the resulting events and publishes them
    /// in a single call to the sink.
    ///
    /// A rejected command changes nothing and publishes nothing.
    pub async fn execute(
        &mut self,
        command: impl Into<WarehouseCommand>,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        self.execute_command(command.into()).await
    }

    #[tracing::instrument(skip(self, command), fields(command_type = command.command_type()))]
    async fn execute_command(
        &mut self,
        command: WarehouseCommand,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        let command_type = command.command_type();

        if self.stale {
            tracing::warn!("refusing command on stale warehouse");
            metrics::counter!(
                "warehouse_commands_total",
                "command" => command_type,
                "outcome" => "stale"
            )
            .increment(1);
            return Err(DomainError::StaleAggregate);
        }

        let events = match self.state.handle(&command) {
            Ok(events) => events,
            Err(error) => {
                let kind = error.kind();
                tracing::warn!(kind = kind.code(), %error, "command rejected");
                metrics::counter!(
                    "warehouse_commands_total",
                    "command" => command_type,
                    "outcome" => "rejected"
                )
                .increment(1);
                metrics::counter!("warehouse_commands_rejected_total", "kind" => kind.code())
                    .increment(1);
                return Err(error.into());
            }
        };

        let envelopes = build_envelopes::<WarehouseState>(self.state.version(), &events)?;

        self.state.apply_events(events.iter().cloned());
        metrics::counter!("warehouse_events_applied_total").increment(events.len() as u64);
        let new_version = self.state.version();

        if let Err(error) = self.sink.publish(envelopes).await {
            self.stale = true;
            tracing::error!(%error, "publishing events failed; warehouse is now stale");
            metrics::counter!("warehouse_publish_failures_total").increment(1);
            metrics::counter!(
                "warehouse_commands_total",
                "command" => command_type,
                "outcome" => "publish_failed"
            )
            .increment(1);
            return Err(error.into());
        }

        metrics::counter!(
            "warehouse_commands_total",
            "command" => command_type,
            "outcome" => "accepted"
        )
        .increment(1);
        tracing::info!(events = events.len(), version = %new_version, "command accepted");

        Ok(CommandResult {
            events,
            new_version,
        })
    }

    /// Receives a quantity of a batch on the Receive location.
    pub async fn receive_batch(
        &mut self,
        batch_id: i64,
        quantity: i64,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        self.execute(ReceiveBatch::new(batch_id, quantity)).await
    }

    /// Ships a quantity of a batch from the Ship location.
    pub async fn ship_batch(
        &mut self,
        batch_id: i64,
        quantity: i64,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        self.execute(ShipBatch::new(batch_id, quantity)).await
    }

    /// Moves a quantity of a batch between two locations.
    pub async fn move_batch(
        &mut self,
        batch_id: i64,
        quantity: i64,
        from_location_id: i64,
        to_location_id: i64,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        self.execute(MoveBatch::new(
            batch_id,
            quantity,
            from_location_id,
            to_location_id,
        ))
        .await
    }

    /// Assembles `quantity` units of a new batch from per-unit components.
    pub async fn assemble_batch(
        &mut self,
        batch_id: i64,
        quantity: i64,
        from: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        self.execute(AssembleBatch::new(batch_id, quantity, from))
            .await
    }

    /// Creates a named location.
    pub async fn create_location(
        &mut self,
        name: impl Into<String>,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        self.execute(CreateLocation::new(name)).await
    }

    /// Registers a named batch.
    pub async fn register_batch(
        &mut self,
        name: impl Into<String>,
        is_pharma: bool,
    ) -> Result<CommandResult<WarehouseEvent>, DomainError> {
        let cmd = if is_pharma {
            RegisterBatch::pharma(name)
        } else {
            RegisterBatch::new(name)
        };
        self.execute(cmd).await
    }
}

impl<S: EventSink> std::fmt::Debug for Warehouse<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Warehouse")
            .field("state", &self.state)
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}
