//! Assigning an agent and planning its route from stored records.

use std::collections::HashSet;

use log::{debug, info, warn};
use thiserror::Error;

use crate::store::{AgentStore, LocationStore, OrderStore, OriginStore, StoreError};
use crate::{
    Agent, BuildError, GeoNode, GraphBuilder, Location, ObjectId, Order, PrecedenceMap,
    RouteFinder, RoutePlan, SolveError,
};

/// Chooses which agent serves a batch of orders.
pub trait AgentMatcher: Send + Sync {
    /// Pick one of `candidates`, or `None` if nobody fits.
    fn select(&self, orders: &[Order], candidates: &[Agent]) -> Option<Agent>;
}

/// Picks the first active candidate, ignoring the orders.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstActiveAgent;

impl AgentMatcher for FirstActiveAgent {
    fn select(&self, _orders: &[Order], candidates: &[Agent]) -> Option<Agent> {
        candidates.iter().find(|agent| agent.is_active()).cloned()
    }
}

/// Outcome of [`Dispatcher::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchPlan {
    /// The agent assigned.
    pub agent_id: ObjectId,
    /// The planned route, or `None` when no route satisfies the constraints.
    pub route: Option<RoutePlan>,
}

/// Errors returned by [`Dispatcher::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Reading records failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The matcher found no agent.
    #[error("no active agent available")]
    NoActiveAgent,
    /// The travel-time graph could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The route finder failed.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Loads a consistent snapshot from a store and plans one agent's route.
///
/// # Examples
/// ```
/// use courier_core::store::{AgentStore, InMemoryStore, LocationStore};
/// use courier_core::{
///     Agent, Category, Coordinates, Dispatcher, FirstActiveAgent, Fixed, Location,
/// };
///
/// let store = InMemoryStore::new();
/// let agent = Agent::new("Ada", "555-0100", Fixed::from_int(20)?)?;
/// let here = Coordinates::new(Fixed::ZERO, Fixed::ZERO)?;
/// store.insert_location(Location::new(agent.id, Category::Agent, here))?;
/// store.insert_agent(agent)?;
///
/// let dispatcher = Dispatcher::new(store, FirstActiveAgent);
/// assert!(dispatcher.store().agents()?.len() == 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Dispatcher<S, M> {
    store: S,
    matcher: M,
    builder: GraphBuilder,
}

impl<S, M> Dispatcher<S, M>
where
    S: AgentStore + OriginStore + OrderStore + LocationStore,
    M: AgentMatcher,
{
    /// A dispatcher using the default graph builder.
    pub const fn new(store: S, matcher: M) -> Self {
        Self::with_builder(store, matcher, GraphBuilder::new())
    }

    /// A dispatcher using an explicit graph builder.
    pub const fn with_builder(store: S, matcher: M, builder: GraphBuilder) -> Self {
        Self {
            store,
            matcher,
            builder,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Assign an agent and plan its route over every stored order.
    ///
    /// The precedence map comes from the full order set. The graph holds the
    /// latest position of every party named by an order plus the agent's
    /// own position.
    pub fn plan<F>(&self, finder: &F) -> Result<DispatchPlan, DispatchError>
    where
        F: RouteFinder<GeoNode> + ?Sized,
    {
        let orders = self.store.orders()?;
        let candidates = self.store.active_agents()?;
        let agent = self
            .matcher
            .select(&orders, &candidates)
            .ok_or(DispatchError::NoActiveAgent)?;
        info!(
            "planning {} orders for agent {} using {}",
            orders.len(),
            agent.id,
            finder.strategy()
        );

        let locations = self.collect_locations(&orders, &agent)?;
        let precedence = PrecedenceMap::from_orders(&orders);
        let graph = self.builder.build(&agent, &locations, &self.store)?;
        let trail = finder.find(&graph, &precedence)?;

        let route = trail.as_ref().map(RoutePlan::from_trail);
        match &route {
            Some(plan) => debug!(
                "agent {} route: {} stops, total cost {}",
                agent.id,
                plan.stops.len(),
                plan.total_cost
            ),
            None => warn!("no feasible route for agent {}", agent.id),
        }
        Ok(DispatchPlan {
            agent_id: agent.id,
            route,
        })
    }

    fn collect_locations(
        &self,
        orders: &[Order],
        agent: &Agent,
    ) -> Result<Vec<Location>, StoreError> {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        for order in orders {
            for party in [order.destination_id, order.origin_id] {
                let location = self.store.latest_location(&party)?;
                if seen.insert(location.id) {
                    locations.push(location);
                }
            }
        }
        locations.push(self.store.latest_location(&agent.id)?);
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;
    use crate::store::InMemoryStore;
    use crate::test_support::{DeliveryFixture, at};
    use crate::{Fixed, Graph, PlanningStrategy, RouteArena, RouteTrail, SearchState};
    use rstest::rstest;
    use std::sync::Mutex;

    /// Records the graph it was handed and returns the start-only trail.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(usize, usize)>>,
    }

    impl RouteFinder<GeoNode> for Recorder {
        fn find(
            &self,
            graph: &Graph<GeoNode>,
            precedence: &PrecedenceMap,
        ) -> Result<Option<RouteTrail<GeoNode>>, SolveError> {
            self.seen
                .lock()
                .expect("lock")
                .push((graph.nodes().len(), precedence.len()));
            let mut arena = RouteArena::new();
            let start = arena.push(
                SearchState {
                    node: *graph.root(),
                    cost: Fixed::ZERO,
                    mask: 0,
                },
                None,
            );
            Ok(arena.into_trail(start))
        }

        fn strategy(&self) -> PlanningStrategy {
            PlanningStrategy::DijkstraWithMask
        }
    }

    struct Never;

    impl RouteFinder<GeoNode> for Never {
        fn find(
            &self,
            _graph: &Graph<GeoNode>,
            _precedence: &PrecedenceMap,
        ) -> Result<Option<RouteTrail<GeoNode>>, SolveError> {
            Ok(None)
        }

        fn strategy(&self) -> PlanningStrategy {
            PlanningStrategy::AllPossiblePaths
        }
    }

    #[rstest]
    fn shared_parties_appear_once() {
        let mut fixture = DeliveryFixture::new();
        let agent = fixture.agent(at(0, 0));
        let kitchen = fixture.origin(Fixed::ZERO, at(0, 100));
        let first = fixture.destination(at(0, 200));
        let second = fixture.destination(at(0, 300));
        fixture.order(first, kitchen);
        fixture.order(second, kitchen);

        let recorder = Recorder::default();
        let plan = Dispatcher::new(fixture.into_store().expect("fresh ids"), FirstActiveAgent)
            .plan(&recorder)
            .expect("plannable");
        assert_eq!(plan.agent_id, agent);
        assert_eq!(plan.route.map(|route| route.stops.len()), Some(0));
        assert_eq!(*recorder.seen.lock().expect("lock"), vec![(4, 2)]);
    }

    #[rstest]
    fn infeasible_routes_are_reported_as_none() {
        let mut fixture = DeliveryFixture::new();
        fixture.agent(at(0, 0));
        let plan = Dispatcher::new(fixture.into_store().expect("fresh ids"), FirstActiveAgent)
            .plan(&Never)
            .expect("plannable");
        assert!(plan.route.is_none());
    }

    #[rstest]
    fn inactive_agents_are_skipped() {
        let store = InMemoryStore::new();
        let agent = Agent::new("Ada", "555", Fixed::from_hundredths(2_000))
            .expect("valid agent")
            .with_status(Status::Inactive);
        store.insert_agent(agent).expect("insert");
        let err = Dispatcher::new(store, FirstActiveAgent)
            .plan(&Never)
            .expect_err("nobody active");
        assert_eq!(err, DispatchError::NoActiveAgent);
    }

    #[rstest]
    fn missing_agent_location_is_a_store_error() {
        let store = InMemoryStore::new();
        let agent = Agent::new("Ada", "555", Fixed::from_hundredths(2_000)).expect("valid agent");
        let id = agent.id;
        store.insert_agent(agent).expect("insert");
        let err = Dispatcher::new(store, FirstActiveAgent)
            .plan(&Never)
            .expect_err("agent never reported a position");
        assert_eq!(
            err,
            DispatchError::Store(StoreError::NoLocation { object_id: id })
        );
    }

    #[rstest]
    fn first_active_agent_respects_candidate_order() {
        let make = |seed| {
            Agent::new("A", "1", Fixed::from_hundredths(100))
                .expect("valid agent")
                .with_id(ObjectId::from_u128(seed))
        };
        let candidates = vec![make(1).with_status(Status::Suspended), make(2), make(3)];
        let chosen = FirstActiveAgent.select(&[], &candidates).map(|a| a.id);
        assert_eq!(chosen, Some(ObjectId::from_u128(2)));
    }
}
