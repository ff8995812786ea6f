//! Error types emitted by the Courier CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use courier_core::store::StoreError;
use courier_core::{AgentError, DispatchError, OriginError, ParseStrategyError};
use thiserror::Error;

/// Errors emitted by the Courier CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The planning strategy name is not recognised.
    #[error(transparent)]
    InvalidStrategy(#[from] ParseStrategyError),
    /// Demo sizes cannot produce a plannable dataset.
    #[error("invalid demo configuration: {reason}")]
    InvalidDemo {
        /// Why the sizes were rejected.
        reason: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option that named the path.
        field: &'static str,
        /// Path that was not found.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option that named the path.
        field: &'static str,
        /// Path that is not a regular file.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option that named the path.
        field: &'static str,
        /// Path that could not be inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the snapshot file failed.
    #[error("failed to open snapshot at {path:?}: {source}")]
    OpenSnapshot {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Snapshot JSON could not be decoded.
    #[error("failed to parse snapshot JSON at {path:?}: {source}")]
    ParseSnapshot {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// Snapshot records could not be loaded into a store.
    #[error("snapshot records are inconsistent: {0}")]
    LoadSnapshot(#[source] StoreError),
    /// A generated agent was rejected.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// A generated origin was rejected.
    #[error(transparent)]
    Origin(#[from] OriginError),
    /// Planning failed.
    #[error("planning failed: {0}")]
    Dispatch(#[from] DispatchError),
    /// Serializing the plan failed.
    #[error("failed to serialize plan: {0}")]
    SerializePlan(#[source] serde_json::Error),
    /// Writing the plan failed.
    #[error("failed to write plan: {0}")]
    WriteOutput(#[source] std::io::Error),
}
