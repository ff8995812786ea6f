//! Proptest strategies for route finder property tests.
//!
//! Instances are small enough for the exhaustive finder to act as an
//! oracle: one agent, up to three origins and up to three destinations.
//! Each destination may depend on one origin.

use courier_core::test_support::{GridPoint, grid_graph, matrix_graph};
use courier_core::{Coordinates, Fixed, Graph, Node, ObjectId, PrecedenceMap};
use proptest::prelude::*;

/// A generated graph and the precedence constraints to solve it under.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Agent first, then origins, then destinations.
    pub graph: Graph<Node>,
    /// Destination to origin requirements.
    pub precedence: PrecedenceMap,
}

/// Stops and constraints before a weighting is chosen.
#[derive(Debug, Clone)]
struct Layout {
    nodes: Vec<Node>,
    precedence: PrecedenceMap,
}

fn layout_strategy() -> impl Strategy<Value = Layout> {
    (1_usize..=3, 1_usize..=3).prop_flat_map(|(origins, destinations)| {
        (
            proptest::collection::vec(0_i64..=1_500, origins),
            proptest::collection::vec(proptest::option::of(0..origins), destinations),
        )
            .prop_map(|(ready_times, requirements)| build_layout(&ready_times, &requirements))
    })
}

fn build_layout(ready_times: &[i64], requirements: &[Option<usize>]) -> Layout {
    let mut seed = 1_u128;
    let mut next_id = || {
        seed = seed.saturating_add(1);
        ObjectId::from_u128(seed)
    };
    let mut nodes = vec![Node::agent(ObjectId::from_u128(1))];
    let origins: Vec<Node> = ready_times
        .iter()
        .map(|&ready| Node::origin(next_id(), Fixed::from_hundredths(ready)))
        .collect();
    nodes.extend(origins.iter().copied());

    let mut precedence = PrecedenceMap::new();
    for requirement in requirements {
        let destination = Node::destination(next_id());
        if let Some(origin) = requirement.and_then(|position| origins.get(position)) {
            precedence.require(destination.object_id, origin.object_id);
        }
        nodes.push(destination);
    }
    Layout { nodes, precedence }
}

/// Instances whose weights are Manhattan distances on a grid.
pub fn grid_instance() -> impl Strategy<Value = Instance> {
    layout_strategy().prop_flat_map(|layout| {
        let count = layout.nodes.len();
        proptest::collection::vec((0_i64..=500, 0_i64..=500), count).prop_map(move |positions| {
            let points: Vec<GridPoint> = layout
                .nodes
                .iter()
                .zip(positions)
                .map(|(&node, (x, y))| GridPoint { node, x, y })
                .collect();
            Instance {
                graph: grid_graph(&points).expect("generated grids are valid"),
                precedence: layout.precedence.clone(),
            }
        })
    })
}

/// Instances with arbitrary, possibly asymmetric, complete weights.
pub fn matrix_instance() -> impl Strategy<Value = Instance> {
    layout_strategy().prop_flat_map(|layout| {
        let count = layout.nodes.len();
        proptest::collection::vec(proptest::collection::vec(0_i64..=1_000, count), count)
            .prop_map(move |weights| Instance {
                graph: matrix_graph(&layout.nodes, &weights)
                    .expect("generated matrices are valid"),
                precedence: layout.precedence.clone(),
            })
    })
}

/// Valid coordinates in hundredths of a degree.
pub fn coordinates() -> impl Strategy<Value = Coordinates> {
    (-9_000_i64..=9_000, -18_000_i64..=18_000).prop_map(|(latitude, longitude)| Coordinates {
        latitude: Fixed::from_hundredths(latitude),
        longitude: Fixed::from_hundredths(longitude),
    })
}
