//! Command drivers: the one-shot build and the watch session.
//!
//! Both share one rebuild cycle: notify every plugin that a build starts,
//! run the bundler, deliver the outcome to every plugin in registration
//! order. The run supervisor sits last in that order, so by the time it
//! restarts the program the artifact on disk is final.

pub mod build;
pub mod watch;

pub use build::execute as build_execute;
pub use watch::execute as watch_execute;

use crate::assemble::BuildConfiguration;
use crate::bundler::Bundler;
use crate::error::Result;
use crate::hooks::{BuildHooks, BuildOutcome};

/// Run one build cycle and dispatch the lifecycle hooks.
///
/// # Errors
///
/// Fails when the bundler cannot be started or a hook reports an error. A
/// build that merely produced diagnostics is a successful cycle with a
/// failed [`BuildOutcome`].
pub(crate) async fn run_cycle(
    config: &mut BuildConfiguration,
    bundler: &dyn Bundler,
) -> Result<BuildOutcome> {
    for plugin in &mut config.plugins {
        plugin.on_build_start();
    }

    let outcome = bundler.build(config).await?;

    for plugin in &mut config.plugins {
        plugin.on_build_end(&outcome).await?;
    }

    Ok(outcome)
}

/// Notify every plugin that the session is over.
///
/// Runs on every exit path so the supervised process and the type checker
/// never outlive the session. Individual hook failures are logged, not
/// propagated, so one plugin cannot block another's teardown.
pub(crate) async fn end_session(config: &mut BuildConfiguration) {
    for plugin in &mut config.plugins {
        if let Err(e) = plugin.on_session_end().await {
            tracing::warn!(plugin = plugin.name(), "session teardown failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::cli::Cli;
    use async_trait::async_trait;
    use bolt_config::{Format, ProjectSettings};
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ScriptedBundler {
        succeed: bool,
        builds: AtomicUsize,
    }

    #[async_trait]
    impl Bundler for ScriptedBundler {
        async fn build(&self, _config: &BuildConfiguration) -> Result<BuildOutcome> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(if self.succeed {
                BuildOutcome::succeeded(Duration::from_millis(10))
            } else {
                BuildOutcome::failed(vec!["expected ;".to_string()], Duration::from_millis(10))
            })
        }
    }

    fn config(args: &[&str]) -> BuildConfiguration {
        let settings = ProjectSettings {
            out_dir: PathBuf::from("dist"),
            out_extension: ".mjs".to_string(),
            format: Format::Esm,
            target: "node20".to_string(),
            externals: vec![],
            allow_list: vec![],
            loader: Default::default(),
            inject: vec![],
            polyfills: vec![],
        };
        let mut argv = vec!["bolt", "app.ts"];
        argv.extend(args);
        assemble(Path::new("app.ts"), &Cli::parse_from(argv), &settings).unwrap()
    }

    #[tokio::test]
    async fn test_cycle_reports_failed_outcome() {
        let bundler = ScriptedBundler {
            succeed: false,
            builds: AtomicUsize::new(0),
        };
        let mut config = config(&[]);

        let outcome = run_cycle(&mut config, &bundler).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(bundler.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_end_session_is_idempotent() {
        let mut config = config(&[]);
        end_session(&mut config).await;
        end_session(&mut config).await;
    }
}
