//! Watch session command.
//!
//! Builds once, then rebuilds whenever a source file changes, until Ctrl+C.
//! Every per-cycle failure is contained: a failed rebuild or a bundler spawn
//! error is reported and the session keeps watching, leaving any supervised
//! process from the last good build running.

use std::path::PathBuf;

use bolt_config::{is_current_dir, output_filename};

use crate::assemble::BuildConfiguration;
use crate::bundler::{Bundler, METAFILE_NAME};
use crate::commands::{end_session, run_cycle};
use crate::error::Result;
use crate::ui;
use crate::watch::SourceWatcher;

/// Execute a watch session over `root`.
///
/// # Errors
///
/// Fails only when the file watcher cannot be started; everything after that
/// is contained within the session.
pub async fn execute(
    config: &mut BuildConfiguration,
    bundler: &dyn Bundler,
    root: PathBuf,
) -> Result<()> {
    let (_watcher, mut changes) = SourceWatcher::start(root, output_ignore_paths(config))?;

    // One listener for the whole session. Recreating it per iteration loses
    // signals that arrive while a rebuild is in flight; keeping the future
    // alive latches them, and selecting over it during the rebuild lets
    // Ctrl+C interrupt even a restart stuck on an uncooperative child.
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut stopping = false;

    tokio::select! {
        _ = &mut shutdown => stopping = true,
        _ = rebuild(config, bundler) => {}
    }

    if !stopping {
        ui::info("Watching for changes... (Ctrl+C to stop)");
    }

    while !stopping {
        tokio::select! {
            _ = &mut shutdown => stopping = true,
            change = changes.recv() => {
                let Some(path) = change else { break };
                // Coalesce whatever else arrived during the last build into
                // this one rebuild.
                while changes.try_recv().is_ok() {}

                tracing::debug!(path = %path.display(), "change detected");
                tokio::select! {
                    _ = &mut shutdown => stopping = true,
                    _ = rebuild(config, bundler) => {}
                }
            }
        }
    }

    eprintln!();
    ui::info("Stopping...");
    end_session(config).await;
    Ok(())
}

/// Build artifacts the watcher must never treat as source changes.
///
/// The output directory is excluded wholesale, but when it is the working
/// directory itself (resolvable from `"main": "index.js"`) that would mean
/// ignoring everything, so the individual output files and the metafile are
/// listed too.
fn output_ignore_paths(config: &BuildConfiguration) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = config
        .entry_points
        .iter()
        .map(|entry| output_filename(entry, &config.out_dir, &config.out_extension))
        .collect();
    paths.push(config.out_dir.join(METAFILE_NAME));

    if !is_current_dir(&config.out_dir) {
        paths.push(config.out_dir.clone());
    }

    paths
}

/// One contained rebuild. Diagnostics from a failed build are printed by the
/// progress plugin; only cycle-level errors surface here.
async fn rebuild(config: &mut BuildConfiguration, bundler: &dyn Bundler) {
    if let Err(e) = run_cycle(config, bundler).await {
        ui::error(&format!("Rebuild failed: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::cli::Cli;
    use crate::error::CliError;
    use crate::hooks::BuildOutcome;
    use async_trait::async_trait;
    use bolt_config::{Format, ProjectSettings};
    use clap::Parser;
    use std::path::Path;

    struct BrokenBundler;

    #[async_trait]
    impl Bundler for BrokenBundler {
        async fn build(&self, _config: &BuildConfiguration) -> Result<BuildOutcome> {
            Err(CliError::Launch {
                program: PathBuf::from("esbuild"),
                source: std::io::Error::other("missing"),
            })
        }
    }

    fn config(out_dir: &str) -> BuildConfiguration {
        let settings = ProjectSettings {
            out_dir: PathBuf::from(out_dir),
            out_extension: ".mjs".to_string(),
            format: Format::Esm,
            target: "node20".to_string(),
            externals: vec![],
            allow_list: vec![],
            loader: Default::default(),
            inject: vec![],
            polyfills: vec![],
        };
        let cli = Cli::parse_from(["bolt", "app.ts"]);
        assemble(Path::new("app.ts"), &cli, &settings).unwrap()
    }

    #[test]
    fn test_ignore_paths_cover_output_dir() {
        let paths = output_ignore_paths(&config("dist"));
        assert!(paths.contains(&PathBuf::from("dist/app.mjs")));
        assert!(paths.contains(&PathBuf::from("dist/meta.json")));
        assert!(paths.contains(&PathBuf::from("dist")));
    }

    #[test]
    fn test_ignore_paths_when_outdir_is_cwd() {
        // The working directory itself must not be listed, only the files
        // the build writes into it.
        let paths = output_ignore_paths(&config("."));
        assert!(paths.contains(&PathBuf::from("./app.mjs")));
        assert!(paths.contains(&PathBuf::from("./meta.json")));
        assert!(!paths.contains(&PathBuf::from(".")));
    }

    #[tokio::test]
    async fn test_rebuild_contains_cycle_errors() {
        // Must not panic or propagate; the session would keep watching.
        let mut config = config("dist");
        rebuild(&mut config, &BrokenBundler).await;
    }
}
