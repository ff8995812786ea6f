//! `ExhaustiveSolver`: depth-first enumeration of every stop ordering.
//!
//! Each stop is visited exactly once, in every order that respects
//! precedence, and the cheapest complete ordering wins. Work grows
//! factorially, so the stop count is capped.

use std::collections::HashMap;

use courier_core::{
    Fixed, Graph, GraphNode, PlanningStrategy, PrecedenceMap, RouteArena, RouteFinder,
    RouteTrail, SearchState, SolveError,
};
use log::debug;

use crate::stops::{StopIndex, arrival_cost};

/// Configuration for [`ExhaustiveSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustiveSolverConfig {
    /// Largest stop count the solver will enumerate.
    pub max_stops: usize,
}

impl Default for ExhaustiveSolverConfig {
    fn default() -> Self {
        Self { max_stops: 10 }
    }
}

/// Brute-force route finder.
///
/// Ties keep the first ordering found; stops are tried in the same stable
/// order [`MaskSolver`](crate::MaskSolver) uses for bit assignment.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveSolver {
    config: ExhaustiveSolverConfig,
}

impl ExhaustiveSolver {
    /// A solver with the default stop cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: ExhaustiveSolverConfig) -> Self {
        Self { config }
    }
}

/// One step of a candidate ordering.
#[derive(Debug, Clone, Copy)]
struct Step {
    slot: usize,
    cost: Fixed,
    mask: u64,
}

struct Enumeration<'i, 'g, N> {
    index: &'i StopIndex<'g, N>,
    weights: HashMap<(usize, usize), Fixed>,
    path: Vec<Step>,
    best: Option<(Fixed, Vec<Step>)>,
    explored: u64,
}

impl<N: GraphNode> Enumeration<'_, '_, N> {
    fn improves(&self, cost: Fixed) -> bool {
        self.best.as_ref().is_none_or(|(best, _)| cost < *best)
    }

    fn explore(&mut self, from: usize, cost: Fixed, mask: u64) {
        self.explored = self.explored.saturating_add(1);
        if !self.improves(cost) {
            return;
        }
        if mask == self.index.full_mask() {
            self.best = Some((cost, self.path.clone()));
            return;
        }
        for position in 0..self.index.len() {
            let Some(slot) = self.index.stop_slot(position) else {
                continue;
            };
            let flag = self.index.bit(slot);
            if mask & flag != 0 || !self.index.allows(slot, mask) {
                continue;
            }
            let (Some(&weight), Some(node)) =
                (self.weights.get(&(from, slot)), self.index.node(slot))
            else {
                continue;
            };
            let step = Step {
                slot,
                cost: arrival_cost(node, cost, weight),
                mask: mask | flag,
            };
            self.path.push(step);
            self.explore(slot, step.cost, step.mask);
            self.path.pop();
        }
    }
}

impl<N: GraphNode> RouteFinder<N> for ExhaustiveSolver {
    fn find(
        &self,
        graph: &Graph<N>,
        precedence: &PrecedenceMap,
    ) -> Result<Option<RouteTrail<N>>, SolveError> {
        let index = StopIndex::new(graph, precedence, self.config.max_stops)?;
        let mut weights = HashMap::new();
        for node in graph.nodes() {
            for edge in graph.edges(node) {
                if let (Some(from), Some(to)) = (index.slot(&edge.from), index.slot(&edge.to)) {
                    weights.insert((from, to), edge.weight);
                }
            }
        }
        let Some(root) = index.slot(graph.root()) else {
            return Ok(None);
        };

        let mut enumeration = Enumeration {
            index: &index,
            weights,
            path: Vec::new(),
            best: None,
            explored: 0,
        };
        enumeration.explore(root, Fixed::ZERO, 0);
        debug!(
            "exhaustive search explored {} partial orderings of {} stops",
            enumeration.explored,
            index.len()
        );

        let Some((_, steps)) = enumeration.best else {
            return Ok(None);
        };
        let mut arena = RouteArena::new();
        let mut previous = arena.push(
            SearchState {
                node: graph.root().clone(),
                cost: Fixed::ZERO,
                mask: 0,
            },
            None,
        );
        for step in steps {
            let Some(node) = index.node(step.slot) else {
                continue;
            };
            previous = arena.push(
                SearchState {
                    node: node.clone(),
                    cost: step.cost,
                    mask: step.mask,
                },
                Some(previous),
            );
        }
        Ok(arena.into_trail(previous))
    }

    fn strategy(&self) -> PlanningStrategy {
        PlanningStrategy::AllPossiblePaths
    }
}
