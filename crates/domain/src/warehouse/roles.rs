//! Well-known locations used by the receive, ship and assemble commands.

use serde::{Deserialize, Serialize};

/// The role a location plays for stock-moving commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationRole {
    /// Where received batches arrive.
    Receive,
    /// Where batches are shipped from.
    Ship,
    /// Where components are assembled into new batches.
    Assemble,
}

impl LocationRole {
    /// All roles.
    pub const ALL: [LocationRole; 3] = [
        LocationRole::Receive,
        LocationRole::Ship,
        LocationRole::Assemble,
    ];
}

impl std::fmt::Display for LocationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationRole::Receive => write!(f, "Receive"),
            LocationRole::Ship => write!(f, "Ship"),
            LocationRole::Assemble => write!(f, "Assemble"),
        }
    }
}

/// Names of the locations playing each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRoles {
    receive: String,
    ship: String,
    assemble: String,
}

impl LocationRoles {
    /// Creates a configuration from explicit names.
    pub fn new(
        receive: impl Into<String>,
        ship: impl Into<String>,
        assemble: impl Into<String>,
    ) -> Self {
        Self {
            receive: receive.into(),
            ship: ship.into(),
            assemble: assemble.into(),
        }
    }

    /// Returns a copy with the name of one role replaced.
    pub fn with_name(mut self, role: LocationRole, name: impl Into<String>) -> Self {
        let name = name.into();
        match role {
            LocationRole::Receive => self.receive = name,
            LocationRole::Ship => self.ship = name,
            LocationRole::Assemble => self.assemble = name,
        }
        self
    }

    /// Returns the location name configured for a role.
    pub fn name(&self, role: LocationRole) -> &str {
        match role {
            LocationRole::Receive => &self.receive,
            LocationRole::Ship => &self.ship,
            LocationRole::Assemble => &self.assemble,
        }
    }

    /// Returns the roles a location name plays.
    ///
    /// Several roles may share one location.
    pub fn roles_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = LocationRole> + 'a {
        LocationRole::ALL
            .into_iter()
            .filter(move |role| self.name(*role) == name)
    }
}

impl Default for LocationRoles {
    fn default() -> Self {
        Self::new("Receive", "Ship", "Assemble")
    }
}
