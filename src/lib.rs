//! Facade crate for the Courier route-planning engine.
//!
//! This crate re-exports the core domain types and exposes the route finders
//! behind feature flags.
//!
//! ```
//! # #[cfg(feature = "solver-mask")]
//! # {
//! use courier_engine::{GeoNode, PlanningStrategy, route_finder};
//!
//! let finder = route_finder::<GeoNode>(PlanningStrategy::AllPossiblePaths);
//! assert_eq!(finder.strategy(), PlanningStrategy::AllPossiblePaths);
//! # }
//! ```

#![forbid(unsafe_code)]

pub use courier_core::{
    Agent, Category, Coordinates, Destination, DispatchError, DispatchPlan, Dispatcher,
    FirstActiveAgent, Fixed, GeoNode, Graph, GraphBuilder, Location, Node, ObjectId, Order,
    Origin, PlanningStrategy, PrecedenceMap, RouteFinder, RoutePlan, RouteTrail, SolveError, Stop,
    store,
};

#[cfg(feature = "solver-mask")]
pub use courier_solver_mask::{
    ExhaustiveSolver, ExhaustiveSolverConfig, MaskSolver, MaskSolverConfig, route_finder,
};
