//! Plugins attached to the build configuration.
//!
//! Each plugin implements [`BuildHooks`] and may additionally contribute
//! flags to the bundler invocation. The assembler registers them in a fixed
//! order (polyfills, externals, type check, progress, run) and hooks are
//! dispatched in that order, so the run supervisor always observes the final
//! build artifact.

pub mod externals;
pub mod polyfill;
pub mod progress;
pub mod run;
pub mod typecheck;

use async_trait::async_trait;

pub use externals::ExternalsPlugin;
pub use polyfill::PolyfillPlugin;
pub use progress::ProgressReporter;
pub use run::{KillSignal, ProcessHandle, ProcessLauncher, ProcessSupervisor, RunCommand};
pub use typecheck::TypeCheckPlugin;

use crate::error::Result;
use crate::hooks::{BuildHooks, BuildOutcome};

/// A registered plugin.
///
/// Enum storage keeps dispatch static while each variant's component
/// implements the [`BuildHooks`] interface on its own.
pub enum Plugin {
    Polyfill(PolyfillPlugin),
    Externals(ExternalsPlugin),
    TypeCheck(TypeCheckPlugin),
    Progress(ProgressReporter),
    Run(ProcessSupervisor),
}

impl Plugin {
    /// Stable plugin name, used for ordering checks and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Plugin::Polyfill(_) => "polyfill",
            Plugin::Externals(_) => "externals",
            Plugin::TypeCheck(_) => "typecheck",
            Plugin::Progress(_) => "progress",
            Plugin::Run(_) => "run",
        }
    }

    /// Flags this plugin contributes to the bundler invocation.
    pub fn bundler_args(&self) -> Vec<String> {
        match self {
            Plugin::Polyfill(p) => p.bundler_args(),
            Plugin::Externals(p) => p.bundler_args(),
            _ => Vec::new(),
        }
    }

    /// Mutable access to the run supervisor, when this is the run plugin.
    pub fn as_supervisor_mut(&mut self) -> Option<&mut ProcessSupervisor> {
        match self {
            Plugin::Run(supervisor) => Some(supervisor),
            _ => None,
        }
    }
}

#[async_trait]
impl BuildHooks for Plugin {
    fn on_build_start(&mut self) {
        match self {
            Plugin::TypeCheck(p) => p.on_build_start(),
            Plugin::Progress(p) => p.on_build_start(),
            Plugin::Polyfill(_) | Plugin::Externals(_) | Plugin::Run(_) => {}
        }
    }

    async fn on_build_end(&mut self, outcome: &BuildOutcome) -> Result<()> {
        match self {
            Plugin::Progress(p) => p.on_build_end(outcome).await,
            Plugin::Run(p) => p.on_build_end(outcome).await,
            Plugin::Polyfill(_) | Plugin::Externals(_) | Plugin::TypeCheck(_) => Ok(()),
        }
    }

    async fn on_session_end(&mut self) -> Result<()> {
        match self {
            Plugin::Run(p) => p.on_session_end().await,
            Plugin::TypeCheck(p) => p.on_session_end().await,
            _ => Ok(()),
        }
    }
}
