//! `MaskSolver`: Dijkstra over (node, visited-set) states.
//!
//! Each state pairs a node with a `u64` mask of the stops visited so far.
//! States leave a min-priority queue in (cost, mask, insertion) order; the
//! first state popped with every bit set is optimal because edge weights are
//! non-negative and arrival costs never decrease along a path.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

use courier_core::{
    Fixed, Graph, GraphNode, PlanningStrategy, PrecedenceMap, RouteArena, RouteFinder,
    RouteTrail, SearchState, SolveError,
};
use log::{debug, trace, warn};

use crate::stops::{MASK_CAPACITY, StopIndex, arrival_cost};

/// Configuration for [`MaskSolver`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskSolverConfig {
    /// Abandon the search once this much time has passed.
    ///
    /// Checked between queue pops; a search that overruns returns
    /// [`SolveError::DeadlineExceeded`] and no partial route.
    pub deadline: Option<Duration>,
}

/// Exact route finder over the (node, visited-set) state space.
///
/// Supports up to 64 stops. Worst-case work grows exponentially with the
/// stop count, so callers planning large batches should set a deadline.
///
/// # Examples
/// ```
/// use courier_core::{Fixed, Graph, Node, ObjectId, PrecedenceMap, RouteFinder};
/// use courier_solver_mask::MaskSolver;
///
/// let agent = Node::agent(ObjectId::from_u128(1));
/// let kitchen = Node::origin(ObjectId::from_u128(2), Fixed::ZERO);
/// let home = Node::destination(ObjectId::from_u128(3));
/// let mut graph = Graph::new(agent)?;
/// graph.add_node(kitchen)?;
/// graph.add_node(home)?;
/// for (from, to) in [(agent, kitchen), (agent, home), (kitchen, home), (home, kitchen)] {
///     graph.add_edge(from, to, Fixed::from_hundredths(100))?;
/// }
/// let mut precedence = PrecedenceMap::new();
/// precedence.require(home.object_id, kitchen.object_id);
///
/// let trail = MaskSolver::new().find(&graph, &precedence)?.expect("feasible");
/// assert_eq!(trail.total_cost(), Fixed::from_hundredths(200));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MaskSolver {
    config: MaskSolverConfig,
}

impl MaskSolver {
    /// A solver without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: MaskSolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &MaskSolverConfig {
        &self.config
    }
}

/// Queue entry; the derived order compares cost, then mask, then insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    cost: Fixed,
    mask: u64,
    sequence: u64,
    record: usize,
}

impl<N: GraphNode> RouteFinder<N> for MaskSolver {
    fn find(
        &self,
        graph: &Graph<N>,
        precedence: &PrecedenceMap,
    ) -> Result<Option<RouteTrail<N>>, SolveError> {
        let started_at = Instant::now();
        let index = StopIndex::new(graph, precedence, MASK_CAPACITY)?;
        let full = index.full_mask();

        let mut arena = RouteArena::new();
        let mut queue = BinaryHeap::new();
        let mut expanded: HashSet<(usize, u64)> = HashSet::new();
        let mut sequence = 0_u64;

        let start = arena.push(
            SearchState {
                node: graph.root().clone(),
                cost: Fixed::ZERO,
                mask: 0,
            },
            None,
        );
        queue.push(Reverse(Frontier {
            cost: Fixed::ZERO,
            mask: 0,
            sequence,
            record: start,
        }));

        while let Some(Reverse(entry)) = queue.pop() {
            if let Some(deadline) = self.config.deadline {
                let elapsed = started_at.elapsed();
                if elapsed >= deadline {
                    warn!("mask search abandoned after {elapsed:?}");
                    return Err(SolveError::DeadlineExceeded { elapsed });
                }
            }

            let Some(node) = arena.get(entry.record).map(|record| record.state.node.clone()) else {
                continue;
            };
            let Some(slot) = index.slot(&node) else {
                continue;
            };
            if !expanded.insert((slot, entry.mask)) {
                continue;
            }
            if entry.mask == full {
                debug!(
                    "mask search finished: cost {}, {} states expanded, {} records",
                    entry.cost,
                    expanded.len(),
                    arena.len()
                );
                return Ok(arena.into_trail(entry.record));
            }

            for edge in graph.edges(&node) {
                if edge.to.is_agent() {
                    continue;
                }
                let Some(next) = index.slot(&edge.to) else {
                    continue;
                };
                if !index.allows(next, entry.mask) {
                    continue;
                }
                let cost = arrival_cost(&edge.to, entry.cost, edge.weight);
                let mask = entry.mask | index.bit(next);
                let record = arena.push(
                    SearchState {
                        node: edge.to.clone(),
                        cost,
                        mask,
                    },
                    Some(entry.record),
                );
                sequence = sequence.saturating_add(1);
                queue.push(Reverse(Frontier {
                    cost,
                    mask,
                    sequence,
                    record,
                }));
            }
        }

        trace!(
            "mask search exhausted {} states without covering {} stops",
            expanded.len(),
            index.len()
        );
        Ok(None)
    }

    fn strategy(&self) -> PlanningStrategy {
        PlanningStrategy::DijkstraWithMask
    }
}
