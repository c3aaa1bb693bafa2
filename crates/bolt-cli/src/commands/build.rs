//! One-shot build command.
//!
//! Builds once and exits non-zero when the bundler reports errors. With
//! `--run` the bundled program is launched after the build and awaited to
//! completion, and its exit code becomes ours.

use crate::assemble::BuildConfiguration;
use crate::bundler::Bundler;
use crate::commands::{end_session, run_cycle};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute a single build.
///
/// Returns the supervised program's exit code when one ran, `None` otherwise.
///
/// # Errors
///
/// Fails when the bundler cannot be started or reports a failed build.
pub async fn execute(
    config: &mut BuildConfiguration,
    bundler: &dyn Bundler,
) -> Result<Option<i32>> {
    let spinner = ui::Spinner::new("Bundling...");

    let outcome = match run_cycle(config, bundler).await {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.fail("Build failed");
            return Err(e);
        }
    };

    if !outcome.success {
        spinner.fail("Build failed");
        for line in &outcome.errors {
            eprintln!("  {line}");
        }
        end_session(config).await;
        return Err(CliError::BuildFailed {
            count: outcome.errors.len(),
        });
    }

    spinner.finish(&format!(
        "Build finished in {}",
        ui::format_duration(outcome.duration)
    ));

    let entries: Vec<(String, u64)> = outcome
        .outputs
        .iter()
        .map(|o| (o.path.display().to_string(), o.bytes))
        .collect();
    ui::print_build_summary(&entries, outcome.duration);

    // With --run the supervisor launched the program during hook dispatch;
    // here it runs to completion instead of being restarted.
    let mut exit_code = None;
    for plugin in &mut config.plugins {
        if let Some(supervisor) = plugin.as_supervisor_mut() {
            exit_code = supervisor.wait_for_exit().await?;
        }
    }

    end_session(config).await;
    Ok(exit_code)
}
