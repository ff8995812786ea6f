//! Search records and the reconstructed route.
//!
//! Route finders append [`RouteRecord`]s to a [`RouteArena`] as they expand
//! states; each record points back to its predecessor by index. Once a
//! terminal record is chosen, [`RouteArena::into_trail`] extracts its chain
//! into a compact [`RouteTrail`] and the rest of the arena is dropped.

use crate::{Category, Coordinates, Fixed, GraphNode, ObjectId};

/// Position, accumulated cost and visited set during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<N> {
    /// Current node.
    pub node: N,
    /// Cost accumulated to reach `node`.
    pub cost: Fixed,
    /// One bit per non-agent node already visited.
    pub mask: u64,
}

/// A search state linked to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord<N> {
    /// The state reached.
    pub state: SearchState<N>,
    /// Arena index of the previous record; `None` for the start.
    pub previous: Option<usize>,
}

/// Append-only storage for records created during one search.
#[derive(Debug, Clone)]
pub struct RouteArena<N> {
    records: Vec<RouteRecord<N>>,
}

impl<N> Default for RouteArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> RouteArena<N> {
    /// An empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record and return its index.
    ///
    /// `previous` should name a record already in the arena; chains that
    /// point forwards are rejected by [`RouteArena::into_trail`].
    pub fn push(&mut self, state: SearchState<N>, previous: Option<usize>) -> usize {
        let index = self.records.len();
        self.records.push(RouteRecord { state, previous });
        index
    }

    /// Borrow the record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RouteRecord<N>> {
        self.records.get(index)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the arena holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take ownership of the chain ending at `terminal`.
    ///
    /// Returns `None` if `terminal` is out of range or the chain is broken.
    #[must_use]
    pub fn into_trail(mut self, terminal: usize) -> Option<RouteTrail<N>> {
        let mut chain = Vec::new();
        let mut cursor = Some(terminal);
        while let Some(index) = cursor {
            if index >= self.records.len() {
                return None;
            }
            let record = self.records.swap_remove(index);
            if record.previous.is_some_and(|previous| previous >= index) {
                return None;
            }
            cursor = record.previous;
            chain.push(record.state);
            // Later indices are gone; only earlier ones are still reachable.
            self.records.truncate(index);
        }
        chain.reverse();
        let records = chain
            .into_iter()
            .enumerate()
            .map(|(position, state)| RouteRecord {
                state,
                previous: position.checked_sub(1),
            })
            .collect();
        Some(RouteTrail { records })
    }
}

/// The winning chain of a search, start first.
///
/// A trail is never empty; its last record is the terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTrail<N> {
    records: Vec<RouteRecord<N>>,
}

impl<N> RouteTrail<N> {
    /// The final record.
    #[must_use]
    pub fn terminal(&self) -> Option<&RouteRecord<N>> {
        self.records.last()
    }

    /// Cost of the terminal state.
    #[must_use]
    pub fn total_cost(&self) -> Fixed {
        self.terminal().map_or(Fixed::ZERO, |record| record.state.cost)
    }

    /// Number of records, including the start.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the trail holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in chronological order, found by following the backward
    /// links from the terminal record.
    #[must_use]
    pub fn flatten(&self) -> Vec<&RouteRecord<N>> {
        let mut ordered = Vec::with_capacity(self.records.len());
        let mut cursor = self.records.len().checked_sub(1);
        while let Some(record) = cursor.and_then(|index| self.records.get(index)) {
            ordered.push(record);
            cursor = record.previous;
        }
        ordered.reverse();
        ordered
    }
}

impl<N: GraphNode> RouteTrail<N> {
    /// Output rows for every record after the start.
    #[must_use]
    pub fn stops(&self) -> Vec<Stop> {
        self.flatten()
            .into_iter()
            .skip(1)
            .map(|record| Stop::from_state(&record.state))
            .collect()
    }
}

/// Free-function form of [`RouteTrail::flatten`].
#[must_use]
pub fn flatten<N>(trail: &RouteTrail<N>) -> Vec<&RouteRecord<N>> {
    trail.flatten()
}

/// One visited stop in a planned route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Party visited.
    pub stop_id: ObjectId,
    /// Role of the party.
    pub category: Category,
    /// Cumulative cost on arrival, after any wait for the ready time.
    pub cost: Fixed,
    /// Earliest time service could begin.
    pub ready_time: Fixed,
    /// Position, when known.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub coordinates: Option<Coordinates>,
}

impl Stop {
    fn from_state<N: GraphNode>(state: &SearchState<N>) -> Self {
        Self {
            stop_id: state.node.object_id(),
            category: state.node.category(),
            cost: state.cost,
            ready_time: state.node.ready_time(),
            coordinates: state.node.coordinates(),
        }
    }
}

/// A serialisable route: the stops after the agent's start and the total.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePlan {
    /// Cost at the final stop.
    pub total_cost: Fixed,
    /// Stops in visiting order.
    pub stops: Vec<Stop>,
}

impl RoutePlan {
    /// Summarise a trail.
    #[must_use]
    pub fn from_trail<N: GraphNode>(trail: &RouteTrail<N>) -> Self {
        Self {
            total_cost: trail.total_cost(),
            stops: trail.stops(),
        }
    }
}
