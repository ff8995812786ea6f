//! Command-line interface for the Courier route planner.
#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::io::Write;

use clap::{Parser, Subcommand};

mod demo;
mod error;
mod fs;
mod plan;
mod snapshot;

pub use error::CliError;

use demo::{DemoArgs, run_demo};
use plan::{PlanArgs, run_plan};

pub(crate) const ARG_SNAPSHOT: &str = "snapshot";
pub(crate) const ARG_STRATEGY: &str = "strategy";
pub(crate) const ARG_DEADLINE_MS: &str = "deadline-ms";
pub(crate) const ARG_DEMO_ORIGINS: &str = "origins";
pub(crate) const ARG_DEMO_DESTINATIONS: &str = "destinations";
pub(crate) const ARG_DEMO_AGENTS: &str = "agents";
pub(crate) const ARG_DEMO_ORDERS: &str = "orders";
pub(crate) const ARG_DEMO_SEED: &str = "seed";
pub(crate) const ENV_PLAN_SNAPSHOT: &str = "COURIER_CMDS_PLAN_SNAPSHOT";

/// Run the Courier CLI with the current process arguments and environment,
/// writing the plan to stdout.
pub fn run() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_with(std::env::args_os(), &mut stdout)
}

/// Run the Courier CLI with explicit arguments, writing the plan to `writer`.
pub fn run_with<I, T>(argv: I, writer: &mut dyn Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args, writer),
        Command::Demo(args) => run_demo(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Plan delivery routes that collect every order before dropping it off",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a route from a JSON snapshot of stored records.
    Plan(PlanArgs),
    /// Generate a seeded random dataset and plan a route over it.
    Demo(DemoArgs),
}

#[cfg(test)]
mod tests;
