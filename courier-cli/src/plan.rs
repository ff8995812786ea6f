//! Plan command implementation for the Courier CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use courier_core::store::InMemoryStore;
use courier_core::{
    DispatchPlan, Dispatcher, FirstActiveAgent, GeoNode, PlanningStrategy, RouteFinder,
};
use courier_solver_mask::{MaskSolver, MaskSolverConfig, route_finder};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::snapshot::load_snapshot;
use crate::{ARG_DEADLINE_MS, ARG_SNAPSHOT, ARG_STRATEGY, CliError, ENV_PLAN_SNAPSHOT};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a route for the first active agent over every order \
                 in a JSON snapshot of agents, origins, destinations, \
                 orders and locations. The plan is written to stdout as JSON.",
    about = "Plan a route from a snapshot"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct PlanArgs {
    /// Path to a JSON snapshot.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) snapshot: Option<Utf8PathBuf>,
    /// Route finder: `dijkstra-with-mask` (default) or `all-possible-paths`.
    #[arg(long = ARG_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
    /// Abandon the mask search after this many milliseconds.
    #[arg(long = ARG_DEADLINE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) deadline_ms: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) snapshot: Utf8PathBuf,
    pub(crate) finder: FinderConfig,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.snapshot, ARG_SNAPSHOT)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let snapshot = args.snapshot.ok_or(CliError::MissingArgument {
            field: ARG_SNAPSHOT,
            env: ENV_PLAN_SNAPSHOT,
        })?;
        Ok(Self {
            snapshot,
            finder: FinderConfig::resolve(args.strategy.as_deref(), args.deadline_ms)?,
        })
    }
}

/// Which route finder to run, and how long the mask search may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct FinderConfig {
    pub(crate) strategy: PlanningStrategy,
    pub(crate) deadline: Option<Duration>,
}

impl FinderConfig {
    pub(crate) fn resolve(
        strategy_name: Option<&str>,
        deadline_ms: Option<u64>,
    ) -> Result<Self, CliError> {
        let strategy = strategy_name
            .map(str::parse::<PlanningStrategy>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            strategy,
            deadline: deadline_ms.map(Duration::from_millis),
        })
    }

    /// The finder for this configuration; the deadline only applies to the
    /// mask solver.
    pub(crate) fn build(&self) -> Box<dyn RouteFinder<GeoNode>> {
        match self.strategy {
            PlanningStrategy::DijkstraWithMask => Box::new(MaskSolver::with_config(
                MaskSolverConfig {
                    deadline: self.deadline,
                },
            )),
            PlanningStrategy::AllPossiblePaths => route_finder(self.strategy),
        }
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match crate::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn run_plan(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    run_plan_with(&config, writer)
}

pub(crate) fn run_plan_with(config: &PlanConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let snapshot = load_snapshot(&config.snapshot)?;
    let store = snapshot.into_store().map_err(CliError::LoadSnapshot)?;
    let plan = dispatch(store, &config.finder)?;
    write_plan(writer, &plan)
}

/// Plan a route over everything in `store`.
pub(crate) fn dispatch(
    store: InMemoryStore,
    finder_config: &FinderConfig,
) -> Result<DispatchPlan, CliError> {
    let finder = finder_config.build();
    info!("dispatching with {}", finder.strategy());
    let dispatcher = Dispatcher::new(store, FirstActiveAgent);
    Ok(dispatcher.plan(finder.as_ref())?)
}

pub(crate) fn write_plan(writer: &mut dyn Write, plan: &DispatchPlan) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(plan).map_err(CliError::SerializePlan)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
