//! Demo command: generate a seeded random dataset and plan a route over it.

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::Parser;
use courier_core::{
    Agent, Category, Coordinates, Destination, Fixed, Location, ObjectId, Order, Origin,
};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::plan::{FinderConfig, dispatch, write_plan};
use crate::snapshot::Snapshot;
use crate::{
    ARG_DEADLINE_MS, ARG_DEMO_AGENTS, ARG_DEMO_DESTINATIONS, ARG_DEMO_ORDERS, ARG_DEMO_ORIGINS,
    ARG_DEMO_SEED, ARG_STRATEGY, CliError,
};

const DEFAULT_ORIGINS: usize = 100;
const DEFAULT_DESTINATIONS: usize = 100;
const DEFAULT_AGENTS: usize = 1;
const DEFAULT_ORDERS: usize = 2;
const DEFAULT_SEED: u64 = 42;

/// Every generated agent travels at 20.00 distance units per time unit.
const AGENT_SPEED: Fixed = Fixed::from_hundredths(2_000);
/// Every generated order is worth 100.00.
const ORDER_AMOUNT: Fixed = Fixed::from_hundredths(10_000);
/// Generated orders and positions are all stamped with this instant.
const GENERATED_AT: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// CLI arguments for the `demo` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate origins, destinations and agents at random \
                 positions, pair the first destinations with random origins \
                 as orders, then plan a route exactly as `plan` would.",
    about = "Plan a route over generated data"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct DemoArgs {
    /// Number of origins to generate.
    #[arg(long = ARG_DEMO_ORIGINS, value_name = "count")]
    #[serde(default)]
    pub(crate) origins: Option<usize>,
    /// Number of destinations to generate.
    #[arg(long = ARG_DEMO_DESTINATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) destinations: Option<usize>,
    /// Number of agents to generate.
    #[arg(long = ARG_DEMO_AGENTS, value_name = "count")]
    #[serde(default)]
    pub(crate) agents: Option<usize>,
    /// Number of orders; must not exceed the destination count.
    #[arg(long = ARG_DEMO_ORDERS, value_name = "count")]
    #[serde(default)]
    pub(crate) orders: Option<usize>,
    /// Seed for the random generator.
    #[arg(long = ARG_DEMO_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Route finder: `dijkstra-with-mask` (default) or `all-possible-paths`.
    #[arg(long = ARG_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
    /// Abandon the mask search after this many milliseconds.
    #[arg(long = ARG_DEADLINE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) deadline_ms: Option<u64>,
}

impl DemoArgs {
    pub(crate) fn into_config(self) -> Result<DemoConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DemoConfig::try_from(merged)
    }
}

/// Resolved `demo` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DemoConfig {
    pub(crate) origins: usize,
    pub(crate) destinations: usize,
    pub(crate) agents: usize,
    pub(crate) orders: usize,
    pub(crate) seed: u64,
    pub(crate) finder: FinderConfig,
}

impl DemoConfig {
    fn validate(&self) -> Result<(), CliError> {
        if self.origins == 0 {
            return Err(CliError::InvalidDemo {
                reason: "at least one origin is required",
            });
        }
        if self.agents == 0 {
            return Err(CliError::InvalidDemo {
                reason: "at least one agent is required",
            });
        }
        if self.orders > self.destinations {
            return Err(CliError::InvalidDemo {
                reason: "each order needs its own destination",
            });
        }
        Ok(())
    }
}

impl TryFrom<DemoArgs> for DemoConfig {
    type Error = CliError;

    fn try_from(args: DemoArgs) -> Result<Self, Self::Error> {
        let config = Self {
            origins: args.origins.unwrap_or(DEFAULT_ORIGINS),
            destinations: args.destinations.unwrap_or(DEFAULT_DESTINATIONS),
            agents: args.agents.unwrap_or(DEFAULT_AGENTS),
            orders: args.orders.unwrap_or(DEFAULT_ORDERS),
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            finder: FinderConfig::resolve(args.strategy.as_deref(), args.deadline_ms)?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Generate the demo dataset for `config`.
///
/// The same configuration always yields the same parties, positions and
/// orders.
pub(crate) fn generate(config: &DemoConfig) -> Result<Snapshot, CliError> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut snapshot = Snapshot::default();

    for index in 0..config.origins {
        let preparation = Fixed::from_hundredths(rng.gen_range(10..=100_i64).saturating_mul(100));
        let origin = Origin::new(
            format!("ORIGIN:{index}"),
            format!("ORIGIN_PHONE:{index}"),
            preparation,
        )?
        .with_id(random_id(&mut rng));
        snapshot.locations.push(random_location(&mut rng, origin.id, Category::Origin));
        snapshot.origins.push(origin);
    }
    for index in 0..config.destinations {
        let destination = Destination::new(
            format!("DESTINATION:{index}"),
            format!("DESTINATION_PHONE:{index}"),
        )
        .with_id(random_id(&mut rng));
        snapshot
            .locations
            .push(random_location(&mut rng, destination.id, Category::Destination));
        snapshot.destinations.push(destination);
    }
    for index in 0..config.agents {
        let agent = Agent::new(
            format!("AGENT:{index}"),
            format!("AGENT_PHONE:{index}"),
            AGENT_SPEED,
        )?
        .with_id(random_id(&mut rng));
        snapshot.locations.push(random_location(&mut rng, agent.id, Category::Agent));
        snapshot.agents.push(agent);
    }

    let origin_ids: Vec<ObjectId> = snapshot.origins.iter().map(|origin| origin.id).collect();
    for destination in snapshot.destinations.iter().take(config.orders) {
        let Some(&origin_id) = origin_ids.get(rng.gen_range(0..origin_ids.len())) else {
            continue;
        };
        let order = Order::new(destination.id, origin_id, ORDER_AMOUNT)
            .with_id(random_id(&mut rng))
            .with_placed_at(GENERATED_AT);
        snapshot.orders.push(order);
    }
    debug!(
        "generated {} origins, {} destinations, {} agents and {} orders from seed {}",
        snapshot.origins.len(),
        snapshot.destinations.len(),
        snapshot.agents.len(),
        snapshot.orders.len(),
        config.seed
    );
    Ok(snapshot)
}

fn random_id(rng: &mut ChaCha8Rng) -> ObjectId {
    ObjectId::from_u128(rng.r#gen())
}

/// A position drawn uniformly over the globe, quantised to hundredths of a
/// degree.
fn random_location(rng: &mut ChaCha8Rng, object_id: ObjectId, category: Category) -> Location {
    let coordinates = Coordinates {
        latitude: Fixed::from_hundredths(rng.gen_range(-9_000..=9_000)),
        longitude: Fixed::from_hundredths(rng.gen_range(-18_000..=18_000)),
    };
    Location {
        id: random_id(rng),
        ..Location::new(object_id, category, coordinates)
    }
    .with_recorded_at(GENERATED_AT)
}

pub(crate) fn run_demo(args: DemoArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_demo_with(&config, writer)
}

pub(crate) fn run_demo_with(config: &DemoConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let snapshot = generate(config)?;
    let store = snapshot.into_store().map_err(CliError::LoadSnapshot)?;
    let plan = dispatch(store, &config.finder)?;
    write_plan(writer, &plan)
}
