use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::{Graph, GraphNode, ObjectId, PrecedenceMap, RouteTrail};

/// Errors returned by [`RouteFinder::find`].
///
/// An infeasible route is not an error: finders report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// A destination in the graph requires an origin the graph lacks.
    #[error("destination {destination} requires origin {origin}, which is not in the graph")]
    MissingReference {
        /// Destination carrying the requirement.
        destination: ObjectId,
        /// Unresolved origin.
        origin: ObjectId,
    },
    /// The graph has more stops than the finder can track.
    #[error("{stops} stops exceed the capacity of {capacity}")]
    TooManyStops {
        /// Non-agent nodes in the graph.
        stops: usize,
        /// Largest supported stop count.
        capacity: usize,
    },
    /// The search ran past its deadline; partial results are discarded.
    #[error("search abandoned after {elapsed:?}")]
    DeadlineExceeded {
        /// Time spent before giving up.
        elapsed: Duration,
    },
}

/// Names a route-finding algorithm.
///
/// # Examples
/// ```
/// use courier_core::PlanningStrategy;
///
/// let strategy: PlanningStrategy = "all-possible-paths".parse()?;
/// assert_eq!(strategy, PlanningStrategy::AllPossiblePaths);
/// assert_eq!(PlanningStrategy::default().to_string(), "dijkstra-with-mask");
/// # Ok::<(), courier_core::ParseStrategyError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum PlanningStrategy {
    /// Dijkstra over (node, visited-set) states.
    #[default]
    DijkstraWithMask,
    /// Exhaustive enumeration of stop orderings.
    AllPossiblePaths,
}

impl PlanningStrategy {
    /// Every known strategy.
    pub const ALL: [Self; 2] = [Self::DijkstraWithMask, Self::AllPossiblePaths];

    /// Kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DijkstraWithMask => "dijkstra-with-mask",
            Self::AllPossiblePaths => "all-possible-paths",
        }
    }
}

impl fmt::Display for PlanningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown planning strategy {name:?}")]
pub struct ParseStrategyError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for PlanningStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ParseStrategyError { name: s.to_owned() })
    }
}

/// Finds the cheapest route visiting every non-agent node of a graph.
///
/// Routes start at [`Graph::root`], never return to it, visit each
/// destination only after its required origins and never begin service at
/// an origin before its ready time. Implementations must be `Send + Sync`
/// so one finder can serve concurrent requests.
pub trait RouteFinder<N: GraphNode>: Send + Sync {
    /// Search `graph` under `precedence`.
    ///
    /// Returns `Ok(None)` when no route satisfies the constraints.
    fn find(
        &self,
        graph: &Graph<N>,
        precedence: &PrecedenceMap,
    ) -> Result<Option<RouteTrail<N>>, SolveError>;

    /// The algorithm this finder implements.
    fn strategy(&self) -> PlanningStrategy;
}
