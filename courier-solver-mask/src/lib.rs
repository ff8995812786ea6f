//! Exact route finders for the Courier engine.
//!
//! [`MaskSolver`] is the default implementation of the
//! [`RouteFinder`](courier_core::RouteFinder) trait. It runs Dijkstra over
//! pairs of (node, visited-set), where the visited set is a `u64` bitmask
//! of the stops served so far, and only enters a destination once every
//! origin it depends on has been visited.
//!
//! [`ExhaustiveSolver`] enumerates every stop ordering instead. It is only
//! practical for a handful of stops and serves as a reference oracle.
//!
//! [`route_finder`] maps a [`PlanningStrategy`] to a boxed finder.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod exhaustive;
mod solver;
mod stops;

use courier_core::{GraphNode, PlanningStrategy, RouteFinder};

pub use exhaustive::{ExhaustiveSolver, ExhaustiveSolverConfig};
pub use solver::{MaskSolver, MaskSolverConfig};

/// The default finder for `strategy`.
///
/// # Examples
/// ```
/// use courier_core::{Node, PlanningStrategy};
/// use courier_solver_mask::route_finder;
///
/// let finder = route_finder::<Node>(PlanningStrategy::AllPossiblePaths);
/// assert_eq!(finder.strategy(), PlanningStrategy::AllPossiblePaths);
/// ```
#[must_use]
pub fn route_finder<N: GraphNode>(strategy: PlanningStrategy) -> Box<dyn RouteFinder<N>> {
    match strategy {
        PlanningStrategy::DijkstraWithMask => Box::new(MaskSolver::new()),
        PlanningStrategy::AllPossiblePaths => Box::new(ExhaustiveSolver::new()),
    }
}
