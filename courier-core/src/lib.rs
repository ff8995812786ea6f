//! Core domain types for the Courier route-planning engine.
//!
//! The crate models delivery parties and their recorded positions, turns
//! them into a complete travel-time graph and defines the contract route
//! finders fulfil. Constructors return `Result` so invalid input surfaces
//! before any search work starts.
//!
//! Data flows one way: [`Location`]s are transformed into [`GeoNode`]s,
//! [`GraphBuilder`] joins them into a [`Graph`], a [`RouteFinder`] searches
//! it under a [`PrecedenceMap`], and the resulting [`RouteTrail`] is
//! flattened into a [`RoutePlan`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod dispatch;
mod distance;
mod entity;
mod fixed;
mod graph;
mod id;
mod location;
mod node;
mod precedence;
mod route;
mod solver;
pub mod store;
mod transform;

pub use builder::{BuildError, GraphBuilder};
pub use dispatch::{AgentMatcher, DispatchError, DispatchPlan, Dispatcher, FirstActiveAgent};
pub use distance::{DistanceCalculator, DistanceStrategy, EARTH_RADIUS_KM, HaversineDistance};
pub use entity::{
    Agent, AgentError, Destination, Order, OrderStatus, Origin, OriginError, Status,
};
pub use fixed::{Fixed, FixedError};
pub use graph::{Edge, Graph, GraphError};
pub use id::ObjectId;
pub use location::{Category, CoordinateError, Coordinates, Location};
pub use node::{GeoNode, GraphNode, Node};
pub use precedence::PrecedenceMap;
pub use route::{RouteArena, RoutePlan, RouteRecord, RouteTrail, SearchState, Stop, flatten};
pub use solver::{ParseStrategyError, PlanningStrategy, RouteFinder, SolveError};
pub use transform::{HaversineNodeTransformer, NodeTransformer, TransformError, TransformStrategy};

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
