//! Progress plugin: build status lines keyed to rebuild events.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::Result;
use crate::hooks::{BuildHooks, BuildOutcome};
use crate::ui;

/// Prints a status line per rebuild event.
///
/// Tracks whether a build is in flight so start and end lines for one
/// rebuild never interleave; the watcher serializes rebuilds, so there is
/// never more than one in flight.
pub struct ProgressReporter {
    /// Clear the terminal before each new status (`--reset`).
    clear: bool,
    started_at: Option<Instant>,
}

impl ProgressReporter {
    pub fn new(clear: bool) -> Self {
        Self {
            clear,
            started_at: None,
        }
    }

    /// Whether a build is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.started_at.is_some()
    }
}

#[async_trait]
impl BuildHooks for ProgressReporter {
    fn on_build_start(&mut self) {
        self.started_at = Some(Instant::now());
        if self.clear {
            let _ = console::Term::stderr().clear_screen();
        }
        ui::info("Build started...");
    }

    async fn on_build_end(&mut self, outcome: &BuildOutcome) -> Result<()> {
        // Build-ended without build-started would interleave lines from an
        // event this reporter never observed; ignore it.
        if self.started_at.take().is_none() {
            return Ok(());
        }

        if outcome.success {
            ui::success(&format!(
                "Build finished in {}",
                ui::format_duration(outcome.duration)
            ));
        } else {
            ui::error(&format!("Build failed with {} error(s)", outcome.errors.len()));
            for line in &outcome.errors {
                eprintln!("  {line}");
            }
        }
        Ok(())
    }
}
