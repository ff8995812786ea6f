//! Repository interfaces for delivery parties, orders and locations.
//!
//! The planner never reaches for global state; callers inject an
//! implementation of these traits. [`InMemoryStore`] is the bundled one.

use std::fmt;

use thiserror::Error;

use crate::{Agent, Destination, Location, ObjectId, Order, Origin};

mod memory;

pub use memory::InMemoryStore;

/// Entity family named in [`StoreError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// [`Agent`] records.
    Agent,
    /// [`Origin`] records.
    Origin,
    /// [`Destination`] records.
    Destination,
    /// [`Order`] records.
    Order,
    /// [`Location`] records.
    Location,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Agent => "agent",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Order => "order",
            Self::Location => "location",
        })
    }
}

/// Errors raised by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with this id already exists.
    #[error("{kind} {id} already exists")]
    Duplicate {
        /// Entity family.
        kind: EntityKind,
        /// Conflicting id.
        id: ObjectId,
    },
    /// No record carries this id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity family.
        kind: EntityKind,
        /// Missing id.
        id: ObjectId,
    },
    /// The party has never reported a position.
    #[error("no location recorded for {object_id}")]
    NoLocation {
        /// Party without a position.
        object_id: ObjectId,
    },
    /// A writer panicked while holding the table lock.
    #[error("{kind} table lock poisoned")]
    Poisoned {
        /// Entity family.
        kind: EntityKind,
    },
}

/// Stores and retrieves [`Agent`] records.
pub trait AgentStore: Send + Sync {
    /// Persist a new agent.
    fn insert_agent(&self, agent: Agent) -> Result<(), StoreError>;

    /// Fetch an agent by id.
    fn agent(&self, id: &ObjectId) -> Result<Agent, StoreError>;

    /// Every agent, in insertion order.
    fn agents(&self) -> Result<Vec<Agent>, StoreError>;

    /// Agents whose status allows work, in insertion order.
    fn active_agents(&self) -> Result<Vec<Agent>, StoreError> {
        let mut agents = self.agents()?;
        agents.retain(Agent::is_active);
        Ok(agents)
    }
}

/// Stores and retrieves [`Origin`] records.
pub trait OriginStore: Send + Sync {
    /// Persist a new origin.
    fn insert_origin(&self, origin: Origin) -> Result<(), StoreError>;

    /// Fetch an origin by id.
    fn origin(&self, id: &ObjectId) -> Result<Origin, StoreError>;

    /// Every origin, in insertion order.
    fn origins(&self) -> Result<Vec<Origin>, StoreError>;
}

/// Stores and retrieves [`Destination`] records.
pub trait DestinationStore: Send + Sync {
    /// Persist a new destination.
    fn insert_destination(&self, destination: Destination) -> Result<(), StoreError>;

    /// Fetch a destination by id.
    fn destination(&self, id: &ObjectId) -> Result<Destination, StoreError>;

    /// Every destination, in insertion order.
    fn destinations(&self) -> Result<Vec<Destination>, StoreError>;
}

/// Stores and retrieves [`Order`] records.
pub trait OrderStore: Send + Sync {
    /// Persist a new order.
    fn insert_order(&self, order: Order) -> Result<(), StoreError>;

    /// Fetch an order by id.
    fn order(&self, id: &ObjectId) -> Result<Order, StoreError>;

    /// Every order, in insertion order.
    fn orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Orders delivered to `destination_id`.
    fn orders_for_destination(&self, destination_id: &ObjectId) -> Result<Vec<Order>, StoreError>;

    /// Orders prepared by `origin_id`.
    fn orders_for_origin(&self, origin_id: &ObjectId) -> Result<Vec<Order>, StoreError>;
}

/// Stores and retrieves [`Location`] records.
pub trait LocationStore: Send + Sync {
    /// Persist a new location.
    fn insert_location(&self, location: Location) -> Result<(), StoreError>;

    /// Fetch a location record by its own id.
    fn location(&self, id: &ObjectId) -> Result<Location, StoreError>;

    /// Every position recorded for a party, in insertion order.
    fn locations_for(&self, object_id: &ObjectId) -> Result<Vec<Location>, StoreError>;

    /// The party's most recent position.
    ///
    /// Ties on `recorded_at` resolve to the record inserted last.
    fn latest_location(&self, object_id: &ObjectId) -> Result<Location, StoreError> {
        self.locations_for(object_id)?
            .into_iter()
            .max_by_key(|location| location.recorded_at)
            .ok_or(StoreError::NoLocation {
                object_id: *object_id,
            })
    }
}
