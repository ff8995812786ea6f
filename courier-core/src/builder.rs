//! Complete travel-time graph construction.

use std::collections::HashSet;

use log::debug;
use thiserror::Error;

use crate::store::OriginStore;
use crate::{
    Agent, AgentError, Category, CoordinateError, DistanceStrategy, FixedError, GeoNode, Graph,
    GraphError, GraphNode, Location, ObjectId, TransformError, TransformStrategy,
};

/// Errors raised by [`GraphBuilder::build`].
///
/// Every variant is a caller error detected before any search work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The agent failed validation.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// A location carries out-of-range coordinates.
    #[error("location of {object_id} has invalid coordinates: {source}")]
    InvalidCoordinates {
        /// Party whose position is invalid.
        object_id: ObjectId,
        /// Range violation.
        #[source]
        source: CoordinateError,
    },
    /// Two locations belong to the same party.
    #[error("party {object_id} appears more than once")]
    DuplicatePoint {
        /// Repeated party.
        object_id: ObjectId,
    },
    /// No location belongs to the agent.
    #[error("no agent location supplied")]
    NoAgentPoint,
    /// More than one location is categorised as an agent.
    #[error("{count} agent locations supplied; expected exactly one")]
    MultipleAgentPoints {
        /// Number of agent locations seen.
        count: usize,
    },
    /// A location could not be turned into a node.
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// The graph rejected a node or edge.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A distance or travel time left the fixed-point range.
    #[error("cannot weigh edge {from} -> {to}: {source}")]
    Weight {
        /// Tail.
        from: ObjectId,
        /// Head.
        to: ObjectId,
        /// Arithmetic failure.
        #[source]
        source: FixedError,
    },
}

/// Builds a complete directed graph over a set of locations.
///
/// Every ordered pair of distinct nodes receives an edge weighted by
/// `distance / speed`, rounded half-to-even to two fractional digits.
///
/// # Examples
/// ```
/// use courier_core::store::{InMemoryStore, OriginStore};
/// use courier_core::{Agent, Category, Coordinates, Fixed, GraphBuilder, Location};
///
/// let agent = Agent::new("Ada", "555-0100", Fixed::from_int(20)?)?;
/// let here = Coordinates::new(Fixed::ZERO, Fixed::ZERO)?;
/// let there = Coordinates::new(Fixed::ZERO, Fixed::from_int(1)?)?;
/// let locations = [
///     Location::new(agent.id, Category::Agent, here),
///     Location::new(courier_core::ObjectId::new(), Category::Destination, there),
/// ];
/// let graph = GraphBuilder::new().build(&agent, &locations, &InMemoryStore::new())?;
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.edges(graph.root())[0].weight.to_string(), "5.56");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphBuilder {
    distance: DistanceStrategy,
    transform: TransformStrategy,
}

impl GraphBuilder {
    /// A builder using the default strategies.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_strategies(DistanceStrategy::Haversine, TransformStrategy::Haversine)
    }

    /// A builder using explicit strategies.
    #[must_use]
    pub const fn with_strategies(distance: DistanceStrategy, transform: TransformStrategy) -> Self {
        Self {
            distance,
            transform,
        }
    }

    /// Build the graph for `agent` over `locations`.
    ///
    /// Exactly one location must be categorised as [`Category::Agent`]; it
    /// becomes the root. The remaining nodes keep their input order.
    pub fn build(
        &self,
        agent: &Agent,
        locations: &[Location],
        origins: &dyn OriginStore,
    ) -> Result<Graph<GeoNode>, BuildError> {
        agent.validate()?;
        validate_locations(locations)?;

        let nodes = self.transform.transformer().transform_many(locations, origins)?;
        let (roots, stops): (Vec<GeoNode>, Vec<GeoNode>) =
            nodes.into_iter().partition(|node| node.is_agent());
        let Some(root) = roots.into_iter().next() else {
            return Err(BuildError::NoAgentPoint);
        };

        let mut graph = Graph::new(root)?;
        for stop in stops {
            graph.add_node(stop)?;
        }

        let calculator = self.distance.calculator();
        let vertices = graph.nodes().to_vec();
        for from in &vertices {
            for to in vertices.iter().filter(|to| *to != from) {
                let weight_error = |source| BuildError::Weight {
                    from: from.object_id(),
                    to: to.object_id(),
                    source,
                };
                let distance = calculator.distance(from, to).map_err(weight_error)?;
                let weight = distance.checked_div(agent.speed).map_err(weight_error)?;
                graph.add_edge(*from, *to, weight)?;
            }
        }

        debug!(
            "built graph for agent {} with {} nodes and {} edges",
            agent.id,
            graph.nodes().len(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

fn validate_locations(locations: &[Location]) -> Result<(), BuildError> {
    let mut seen = HashSet::with_capacity(locations.len());
    for location in locations {
        location
            .coordinates
            .validate()
            .map_err(|source| BuildError::InvalidCoordinates {
                object_id: location.object_id,
                source,
            })?;
        if !seen.insert(location.object_id) {
            return Err(BuildError::DuplicatePoint {
                object_id: location.object_id,
            });
        }
    }
    match locations
        .iter()
        .filter(|location| location.category == Category::Agent)
        .count()
    {
        0 => Err(BuildError::NoAgentPoint),
        1 => Ok(()),
        count => Err(BuildError::MultipleAgentPoints { count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::{Coordinates, Fixed, HaversineDistance, Origin};
    use rstest::{fixture, rstest};

    struct Setup {
        agent: Agent,
        store: InMemoryStore,
        locations: Vec<Location>,
    }

    fn at(lat: i64, lon: i64) -> Coordinates {
        Coordinates {
            latitude: Fixed::from_hundredths(lat),
            longitude: Fixed::from_hundredths(lon),
        }
    }

    #[fixture]
    fn setup() -> Setup {
        let agent = Agent::new("Ada", "555", Fixed::from_hundredths(2_000)).expect("valid agent");
        let store = InMemoryStore::new();
        let origin = Origin::new("Kitchen", "555", Fixed::ZERO).expect("valid origin");
        let origin_id = origin.id;
        store.insert_origin(origin).expect("insert");
        let locations = vec![
            Location::new(ObjectId::new(), Category::Destination, at(0, 200)),
            Location::new(origin_id, Category::Origin, at(0, 100)),
            Location::new(agent.id, Category::Agent, at(0, 0)),
        ];
        Setup {
            agent,
            store,
            locations,
        }
    }

    #[rstest]
    fn builds_complete_graph_without_self_loops(setup: Setup) {
        let graph = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect("valid input");
        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.root().is_agent());
        for node in graph.nodes() {
            assert!(graph.edges(node).iter().all(|edge| edge.to != *node));
        }
    }

    #[rstest]
    fn weights_are_distance_over_speed(setup: Setup) {
        let graph = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect("valid input");
        for node in graph.nodes() {
            for edge in graph.edges(node) {
                let distance =
                    HaversineDistance::between(&edge.from.coordinates, &edge.to.coordinates)
                        .expect("finite");
                let expected = distance.checked_div(setup.agent.speed).expect("non-zero speed");
                assert_eq!(edge.weight, expected);
            }
        }
    }

    #[rstest]
    fn stops_keep_input_order_after_root(setup: Setup) {
        let graph = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect("valid input");
        let categories: Vec<_> = graph.nodes().iter().map(|node| node.category()).collect();
        assert_eq!(
            categories,
            vec![Category::Agent, Category::Destination, Category::Origin]
        );
    }

    #[rstest]
    fn requires_an_agent_location(mut setup: Setup) {
        setup.locations.retain(|l| l.category != Category::Agent);
        let err = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect_err("no agent");
        assert_eq!(err, BuildError::NoAgentPoint);
    }

    #[rstest]
    fn rejects_second_agent_location(mut setup: Setup) {
        setup
            .locations
            .push(Location::new(ObjectId::new(), Category::Agent, at(1, 1)));
        let err = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect_err("two agents");
        assert_eq!(err, BuildError::MultipleAgentPoints { count: 2 });
    }

    #[rstest]
    fn rejects_duplicate_parties(mut setup: Setup) {
        let repeated = setup.locations.first().expect("fixture locations").object_id;
        setup
            .locations
            .push(Location::new(repeated, Category::Destination, at(5, 5)));
        let err = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect_err("duplicate party");
        assert_eq!(err, BuildError::DuplicatePoint { object_id: repeated });
    }

    #[rstest]
    fn rejects_invalid_coordinates(mut setup: Setup) {
        setup.locations.first_mut().expect("fixture locations").coordinates = at(9_500, 0);
        let err = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect_err("latitude out of range");
        assert!(matches!(err, BuildError::InvalidCoordinates { .. }));
    }

    #[rstest]
    fn rejects_non_positive_speed(mut setup: Setup) {
        setup.agent.speed = Fixed::ZERO;
        let err = GraphBuilder::new()
            .build(&setup.agent, &setup.locations, &setup.store)
            .expect_err("zero speed");
        assert!(matches!(err, BuildError::Agent(_)));
    }
}
