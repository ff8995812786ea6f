//! Lock-guarded in-memory repository.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::trace;

use super::{
    AgentStore, DestinationStore, EntityKind, LocationStore, OrderStore, OriginStore, StoreError,
};
use crate::{Agent, Destination, Location, ObjectId, Order, Origin};

/// Insertion-ordered rows with an id index.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    index: HashMap<ObjectId, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, kind: EntityKind, id: ObjectId, row: T) -> Result<usize, StoreError> {
        if self.index.contains_key(&id) {
            return Err(StoreError::Duplicate { kind, id });
        }
        let slot = self.rows.len();
        self.index.insert(id, slot);
        self.rows.push(row);
        Ok(slot)
    }

    fn get(&self, kind: EntityKind, id: &ObjectId) -> Result<T, StoreError> {
        self.index
            .get(id)
            .and_then(|&slot| self.rows.get(slot))
            .cloned()
            .ok_or(StoreError::NotFound { kind, id: *id })
    }

    fn gather(&self, slots: Option<&Vec<usize>>) -> Vec<T> {
        slots
            .into_iter()
            .flatten()
            .filter_map(|&slot| self.rows.get(slot))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
struct OrderTable {
    table: Table<Order>,
    by_destination: HashMap<ObjectId, Vec<usize>>,
    by_origin: HashMap<ObjectId, Vec<usize>>,
}

#[derive(Debug, Default)]
struct LocationTable {
    table: Table<Location>,
    by_object: HashMap<ObjectId, Vec<usize>>,
}

/// Thread-safe store holding every entity family in memory.
///
/// Each family sits behind its own [`RwLock`], so concurrent readers see a
/// consistent table and a writer blocks only its own family.
///
/// # Examples
/// ```
/// use courier_core::store::{AgentStore, InMemoryStore};
/// use courier_core::{Agent, Fixed};
///
/// let store = InMemoryStore::new();
/// let agent = Agent::new("Ada", "555-0100", Fixed::from_int(20)?)?;
/// store.insert_agent(agent.clone())?;
/// assert_eq!(store.agent(&agent.id)?, agent);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    agents: RwLock<Table<Agent>>,
    origins: RwLock<Table<Origin>>,
    destinations: RwLock<Table<Destination>>,
    orders: RwLock<OrderTable>,
    locations: RwLock<LocationTable>,
}

fn read<T>(lock: &RwLock<T>, kind: EntityKind) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| StoreError::Poisoned { kind })
}

fn write<T>(lock: &RwLock<T>, kind: EntityKind) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| StoreError::Poisoned { kind })
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgentStore for InMemoryStore {
    fn insert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        let id = agent.id;
        write(&self.agents, EntityKind::Agent)?.insert(EntityKind::Agent, id, agent)?;
        trace!("stored agent {id}");
        Ok(())
    }

    fn agent(&self, id: &ObjectId) -> Result<Agent, StoreError> {
        read(&self.agents, EntityKind::Agent)?.get(EntityKind::Agent, id)
    }

    fn agents(&self) -> Result<Vec<Agent>, StoreError> {
        Ok(read(&self.agents, EntityKind::Agent)?.rows.clone())
    }
}

impl OriginStore for InMemoryStore {
    fn insert_origin(&self, origin: Origin) -> Result<(), StoreError> {
        let id = origin.id;
        write(&self.origins, EntityKind::Origin)?.insert(EntityKind::Origin, id, origin)?;
        trace!("stored origin {id}");
        Ok(())
    }

    fn origin(&self, id: &ObjectId) -> Result<Origin, StoreError> {
        read(&self.origins, EntityKind::Origin)?.get(EntityKind::Origin, id)
    }

    fn origins(&self) -> Result<Vec<Origin>, StoreError> {
        Ok(read(&self.origins, EntityKind::Origin)?.rows.clone())
    }
}

impl DestinationStore for InMemoryStore {
    fn insert_destination(&self, destination: Destination) -> Result<(), StoreError> {
        let id = destination.id;
        write(&self.destinations, EntityKind::Destination)?.insert(
            EntityKind::Destination,
            id,
            destination,
        )?;
        trace!("stored destination {id}");
        Ok(())
    }

    fn destination(&self, id: &ObjectId) -> Result<Destination, StoreError> {
        read(&self.destinations, EntityKind::Destination)?.get(EntityKind::Destination, id)
    }

    fn destinations(&self) -> Result<Vec<Destination>, StoreError> {
        Ok(read(&self.destinations, EntityKind::Destination)?
            .rows
            .clone())
    }
}

impl OrderStore for InMemoryStore {
    fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        let (id, destination_id, origin_id) = (order.id, order.destination_id, order.origin_id);
        let mut guard = write(&self.orders, EntityKind::Order)?;
        let slot = guard.table.insert(EntityKind::Order, id, order)?;
        guard
            .by_destination
            .entry(destination_id)
            .or_default()
            .push(slot);
        guard.by_origin.entry(origin_id).or_default().push(slot);
        trace!("stored order {id}");
        Ok(())
    }

    fn order(&self, id: &ObjectId) -> Result<Order, StoreError> {
        read(&self.orders, EntityKind::Order)?
            .table
            .get(EntityKind::Order, id)
    }

    fn orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(read(&self.orders, EntityKind::Order)?.table.rows.clone())
    }

    fn orders_for_destination(&self, destination_id: &ObjectId) -> Result<Vec<Order>, StoreError> {
        let guard = read(&self.orders, EntityKind::Order)?;
        Ok(guard.table.gather(guard.by_destination.get(destination_id)))
    }

    fn orders_for_origin(&self, origin_id: &ObjectId) -> Result<Vec<Order>, StoreError> {
        let guard = read(&self.orders, EntityKind::Order)?;
        Ok(guard.table.gather(guard.by_origin.get(origin_id)))
    }
}

impl LocationStore for InMemoryStore {
    fn insert_location(&self, location: Location) -> Result<(), StoreError> {
        let (id, object_id) = (location.id, location.object_id);
        let mut guard = write(&self.locations, EntityKind::Location)?;
        let slot = guard.table.insert(EntityKind::Location, id, location)?;
        guard.by_object.entry(object_id).or_default().push(slot);
        trace!("stored location {id} for {object_id}");
        Ok(())
    }

    fn location(&self, id: &ObjectId) -> Result<Location, StoreError> {
        read(&self.locations, EntityKind::Location)?
            .table
            .get(EntityKind::Location, id)
    }

    fn locations_for(&self, object_id: &ObjectId) -> Result<Vec<Location>, StoreError> {
        let guard = read(&self.locations, EntityKind::Location)?;
        Ok(guard.table.gather(guard.by_object.get(object_id)))
    }
}
