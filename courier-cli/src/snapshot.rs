//! JSON snapshots of every record a plan needs.

use std::io::BufReader;

use camino::Utf8Path;
use courier_core::store::{
    AgentStore, DestinationStore, InMemoryStore, LocationStore, OrderStore, OriginStore,
    StoreError,
};
use courier_core::{Agent, Destination, Location, Order, Origin};
use serde::{Deserialize, Serialize};

use crate::CliError;
use crate::fs::open_utf8_file;

/// Parties, orders and recorded positions, as read by `courier plan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub(crate) agents: Vec<Agent>,
    #[serde(default)]
    pub(crate) origins: Vec<Origin>,
    #[serde(default)]
    pub(crate) destinations: Vec<Destination>,
    #[serde(default)]
    pub(crate) orders: Vec<Order>,
    #[serde(default)]
    pub(crate) locations: Vec<Location>,
}

impl Snapshot {
    /// Load every record into a fresh store, rejecting repeated ids.
    pub(crate) fn into_store(self) -> Result<InMemoryStore, StoreError> {
        let store = InMemoryStore::new();
        for agent in self.agents {
            store.insert_agent(agent)?;
        }
        for origin in self.origins {
            store.insert_origin(origin)?;
        }
        for destination in self.destinations {
            store.insert_destination(destination)?;
        }
        for order in self.orders {
            store.insert_order(order)?;
        }
        for location in self.locations {
            store.insert_location(location)?;
        }
        Ok(store)
    }
}

/// Loads a JSON-encoded [`Snapshot`] from disk.
pub(crate) fn load_snapshot(path: &Utf8Path) -> Result<Snapshot, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenSnapshot {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseSnapshot {
        path: path.to_path_buf(),
        source,
    })
}
