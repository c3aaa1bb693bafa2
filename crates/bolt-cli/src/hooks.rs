//! Build lifecycle hooks.
//!
//! The bundler boundary notifies plugins through this narrow interface:
//! build started, build ended (with the outcome), session ended. Hooks fire
//! in plugin registration order and only one rebuild is ever in flight, so
//! implementations never need to guard against concurrent invocations.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// One file emitted by a build, from the bundler's output manifest.
#[derive(Debug, Clone)]
pub struct OutputFile {
    /// Path of the emitted file, relative to the working directory.
    pub path: PathBuf,
    /// File size in bytes.
    pub bytes: u64,
}

/// Result of one build attempt.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Whether the bundler completed without errors.
    pub success: bool,
    /// Bundler error text, one entry per reported error.
    pub errors: Vec<String>,
    /// Wall-clock build duration.
    pub duration: Duration,
    /// Emitted files on success, empty on failure.
    pub outputs: Vec<OutputFile>,
}

impl BuildOutcome {
    /// A successful outcome with no outputs, for tests and synthetic events.
    pub fn succeeded(duration: Duration) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            duration,
            outputs: Vec::new(),
        }
    }

    /// A failed outcome carrying the given error lines.
    pub fn failed(errors: Vec<String>, duration: Duration) -> Self {
        Self {
            success: false,
            errors,
            duration,
            outputs: Vec::new(),
        }
    }
}

/// Lifecycle notifications delivered to each plugin.
///
/// `on_build_end` may suspend; the run supervisor uses this to await the
/// previous process's exit before launching its replacement, which is the
/// only point where rebuild handling intentionally blocks.
#[async_trait]
pub trait BuildHooks: Send {
    /// A rebuild is starting.
    fn on_build_start(&mut self) {}

    /// A rebuild finished with `outcome`.
    async fn on_build_end(&mut self, outcome: &BuildOutcome) -> Result<()> {
        let _ = outcome;
        Ok(())
    }

    /// The watch session is ending; release any held resources.
    async fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}
