//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use log::error;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = courier_cli::run() {
        error!("courier: {err}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
/// Records from the `log` facade are forwarded to the same subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
