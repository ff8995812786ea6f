//! Test-only builders for delivery datasets, hand-made graphs and route
//! checks.
//!
//! Available to unit tests and, through the `test-support` feature, to
//! behavioural tests in downstream crates.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::store::{
    AgentStore, DestinationStore, InMemoryStore, LocationStore, OrderStore, OriginStore, StoreError,
};
use crate::{
    Agent, Category, Coordinates, Destination, Fixed, Graph, GraphError, GraphNode, Location, Node,
    ObjectId, Order, OrderStatus, Origin, PrecedenceMap, RouteTrail, Status,
};

/// Coordinates from latitude and longitude expressed in hundredths of a
/// degree. No range check is applied.
#[must_use]
pub const fn at(latitude: i64, longitude: i64) -> Coordinates {
    Coordinates {
        latitude: Fixed::from_hundredths(latitude),
        longitude: Fixed::from_hundredths(longitude),
    }
}

/// Default agent speed used by [`DeliveryFixture::agent`].
pub const DEFAULT_SPEED: Fixed = Fixed::from_hundredths(2_000);

/// Accumulates parties, orders and positions with sequential ids.
#[derive(Debug, Default)]
pub struct DeliveryFixture {
    next_id: u128,
    agents: Vec<Agent>,
    origins: Vec<Origin>,
    destinations: Vec<Destination>,
    orders: Vec<Order>,
    locations: Vec<Location>,
}

impl DeliveryFixture {
    /// An empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> ObjectId {
        self.next_id = self.next_id.saturating_add(1);
        ObjectId::from_u128(self.next_id)
    }

    fn place(&mut self, object_id: ObjectId, category: Category, coordinates: Coordinates) {
        let id = self.fresh_id();
        self.locations.push(Location {
            id,
            object_id,
            category,
            recorded_at: epoch(),
            coordinates,
        });
    }

    /// Add an active agent travelling at [`DEFAULT_SPEED`].
    pub fn agent(&mut self, coordinates: Coordinates) -> ObjectId {
        self.agent_with_speed(DEFAULT_SPEED, coordinates)
    }

    /// Add an active agent with an explicit speed.
    pub fn agent_with_speed(&mut self, speed: Fixed, coordinates: Coordinates) -> ObjectId {
        let id = self.fresh_id();
        self.agents.push(Agent {
            id,
            name: format!("agent-{id}"),
            phone: String::new(),
            speed,
            status: Status::Active,
        });
        self.place(id, Category::Agent, coordinates);
        id
    }

    /// Add an origin with the given preparation time.
    pub fn origin(&mut self, preparation_time: Fixed, coordinates: Coordinates) -> ObjectId {
        let id = self.fresh_id();
        self.origins.push(Origin {
            id,
            name: format!("origin-{id}"),
            phone: String::new(),
            status: Status::Active,
            preparation_time,
        });
        self.place(id, Category::Origin, coordinates);
        id
    }

    /// Add a destination.
    pub fn destination(&mut self, coordinates: Coordinates) -> ObjectId {
        let id = self.fresh_id();
        self.destinations.push(Destination {
            id,
            name: format!("destination-{id}"),
            phone: String::new(),
            status: Status::Active,
        });
        self.place(id, Category::Destination, coordinates);
        id
    }

    /// Add a pending order from `origin` to `destination`.
    pub fn order(&mut self, destination: ObjectId, origin: ObjectId) -> ObjectId {
        let id = self.fresh_id();
        self.orders.push(Order {
            id,
            destination_id: destination,
            origin_id: origin,
            amount: Fixed::from_hundredths(10_000),
            placed_at: epoch(),
            status: OrderStatus::Pending,
        });
        id
    }

    /// Load everything into a fresh [`InMemoryStore`].
    pub fn into_store(self) -> Result<InMemoryStore, StoreError> {
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

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Build a graph over `nodes` whose first entry is the agent.
///
/// `weights[i][j]` is the travel time, in hundredths, from `nodes[i]` to
/// `nodes[j]`. Diagonal entries and missing or negative cells produce no
/// edge, so sparse graphs can be described with short rows.
///
/// # Errors
///
/// Fails when `nodes` is empty, does not start with an agent or repeats a
/// node.
pub fn matrix_graph(nodes: &[Node], weights: &[Vec<i64>]) -> Result<Graph<Node>, GraphError> {
    let mut iter = nodes.iter();
    let Some(root) = iter.next() else {
        return Err(GraphError::RootNotAgent {
            object_id: ObjectId::from_u128(0),
        });
    };
    let mut graph = Graph::new(*root)?;
    for node in iter {
        graph.add_node(*node)?;
    }
    for (from, row) in nodes.iter().zip(weights) {
        for (to, &weight) in nodes.iter().zip(row) {
            if from == to || weight < 0 {
                continue;
            }
            graph.add_edge(*from, *to, Fixed::from_hundredths(weight))?;
        }
    }
    Ok(graph)
}

/// A node placed on an integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    /// The node.
    pub node: Node,
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

/// Complete graph weighted by Manhattan distance between grid points.
///
/// Manhattan weights obey the triangle inequality, so detours through
/// visited stops never pay off.
///
/// # Errors
///
/// As for [`matrix_graph`].
pub fn grid_graph(points: &[GridPoint]) -> Result<Graph<Node>, GraphError> {
    let nodes: Vec<Node> = points.iter().map(|point| point.node).collect();
    let weights: Vec<Vec<i64>> = points
        .iter()
        .map(|from| {
            points
                .iter()
                .map(|to| {
                    from.x
                        .abs_diff(to.x)
                        .saturating_add(from.y.abs_diff(to.y))
                        .try_into()
                        .unwrap_or(i64::MAX)
                })
                .collect()
        })
        .collect();
    matrix_graph(&nodes, &weights)
}

/// Object ids of every stop after the start, in visiting order.
#[must_use]
pub fn visit_order<N: GraphNode>(trail: &RouteTrail<N>) -> Vec<ObjectId> {
    trail
        .flatten()
        .into_iter()
        .skip(1)
        .map(|record| record.state.node.object_id())
        .collect()
}

/// Whether every destination in `trail` follows all of its required origins.
#[must_use]
pub fn respects_precedence<N: GraphNode>(trail: &RouteTrail<N>, precedence: &PrecedenceMap) -> bool {
    let mut visited = HashSet::new();
    for record in trail.flatten() {
        let node = &record.state.node;
        if node.category() == Category::Destination
            && precedence
                .requirements(&node.object_id())
                .any(|origin| !visited.contains(origin))
        {
            return false;
        }
        visited.insert(node.object_id());
    }
    true
}

/// Whether every origin in `trail` is reached no earlier than its ready time.
#[must_use]
pub fn respects_ready_times<N: GraphNode>(trail: &RouteTrail<N>) -> bool {
    trail.flatten().into_iter().all(|record| {
        record.state.node.category() != Category::Origin
            || record.state.cost >= record.state.node.ready_time()
    })
}

/// Whether costs never decrease along `trail`.
#[must_use]
pub fn costs_non_decreasing<N: GraphNode>(trail: &RouteTrail<N>) -> bool {
    trail
        .flatten()
        .windows(2)
        .all(|pair| match pair {
            [earlier, later] => earlier.state.cost <= later.state.cost,
            _ => true,
        })
}
