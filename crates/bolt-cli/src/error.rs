//! Error handling for the Bolt CLI.
//!
//! A single `thiserror` hierarchy covers the whole binary. The propagation
//! policy is asymmetric by design: configuration-phase errors abort the
//! invocation with a non-zero exit, while everything that happens inside a
//! watch session (failed rebuilds, launch failures, unexpected child exits)
//! is reported and contained so one bad cycle never ends the session.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Project settings could not be resolved. Fatal.
    #[error("Configuration error: {0}")]
    Config(#[from] bolt_config::ConfigError),

    /// Entry point file doesn't exist
    #[error("Entry point not found: {}\n\nHint: bolt expects a source file, e.g. `bolt src/app.ts`", .0.display())]
    EntryNotFound(PathBuf),

    /// The bundler reported a failed build
    #[error("Build failed with {count} error(s)")]
    BuildFailed {
        /// Number of bundler errors
        count: usize,
    },

    /// An external executable could not be started
    #[error("Failed to launch {}: {source}\n\nHint: check that the file exists and is executable", .program.display())]
    Launch {
        /// The executable we tried to start
        program: PathBuf,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON errors (bundler metafile)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error to a miette report for terminal rendering.
pub fn into_report(err: CliError) -> miette::Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}
