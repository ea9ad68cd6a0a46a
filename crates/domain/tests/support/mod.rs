//! Given/When/Then scenarios for the warehouse aggregate.
//!
//! `given` replays history into a fresh warehouse over an
//! [`InMemoryEventSink`], `when` queues commands, and `then` / `then_error`
//! execute them and check what reached the sink.

#![allow(dead_code)]

use domain::{
    DomainError, ErrorKind, LocationRoles, Warehouse, WarehouseCommand, WarehouseEvent,
    WarehouseState, decode_envelopes,
};
use event_sink::InMemoryEventSink;

pub type TestWarehouse = Warehouse<InMemoryEventSink>;

/// Starts a scenario from a history.
pub fn given(history: impl IntoIterator<Item = WarehouseEvent>) -> Given {
    Given {
        history: history.into_iter().collect(),
        roles: LocationRoles::default(),
    }
}

/// History shared by most scenarios: the three well-known locations plus a
/// store.
pub fn standard_locations() -> Vec<WarehouseEvent> {
    vec![
        WarehouseEvent::created_location(1, "Receive"),
        WarehouseEvent::created_location(2, "Ship"),
        WarehouseEvent::created_location(3, "Assemble"),
        WarehouseEvent::created_location(4, "Store"),
    ]
}

/// Returns every event the sink recorded, decoded.
pub async fn published(sink: &InMemoryEventSink) -> Vec<WarehouseEvent> {
    decode_envelopes::<WarehouseState>(&sink.events().await)
        .expect("published envelopes decode as warehouse events")
}

pub struct Given {
    history: Vec<WarehouseEvent>,
    roles: LocationRoles,
}

impl Given {
    /// Uses custom names for the well-known locations.
    pub fn with_roles(mut self, roles: LocationRoles) -> Self {
        self.roles = roles;
        self
    }

    /// Queues the first command.
    pub fn when(self, command: impl Into<WarehouseCommand>) -> When {
        When {
            given: self,
            commands: vec![command.into()],
        }
    }
}

pub struct When {
    given: Given,
    commands: Vec<WarehouseCommand>,
}

impl When {
    /// Queues another command.
    pub fn and(mut self, command: impl Into<WarehouseCommand>) -> Self {
        self.commands.push(command.into());
        self
    }

    fn build(&self) -> (TestWarehouse, InMemoryEventSink) {
        let sink = InMemoryEventSink::new();
        let warehouse = Warehouse::with_roles(
            sink.clone(),
            self.given.roles.clone(),
            self.given.history.clone(),
        )
        .expect("given history replays");
        (warehouse, sink)
    }

    /// Executes every command and asserts the sink received exactly
    /// `expected`, in order.
    pub async fn then(self, expected: impl IntoIterator<Item = WarehouseEvent>) -> TestWarehouse {
        let (mut warehouse, sink) = self.build();

        for command in self.commands {
            let description = format!("{command:?}");
            if let Err(error) = warehouse.execute(command).await {
                panic!("command {description} was rejected: {error}");
            }
        }

        let expected: Vec<_> = expected.into_iter().collect();
        assert_eq!(published(&sink).await, expected);
        warehouse
    }

    /// Executes the commands, expecting the last one to fail with `kind`.
    ///
    /// Asserts the failing command left the state and the sink untouched.
    pub async fn then_error(mut self, kind: ErrorKind) -> DomainError {
        let (mut warehouse, sink) = self.build();
        let last = self.commands.pop().expect("at least one command");

        for command in self.commands {
            warehouse
                .execute(command)
                .await
                .expect("setup command succeeds");
        }

        let state_before = warehouse.state().clone();
        let events_before = sink.event_count().await;

        let error = warehouse
            .execute(last)
            .await
            .expect_err("command should be rejected");

        assert_eq!(error.kind(), kind, "unexpected error: {error}");
        assert_eq!(warehouse.state(), &state_before);
        assert_eq!(sink.event_count().await, events_before);
        error
    }
}
