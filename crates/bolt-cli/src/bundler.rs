//! The external-bundler boundary.
//!
//! Bundling itself is delegated to the `esbuild` executable; this module maps
//! a [`BuildConfiguration`] onto its command line, runs it, and turns the
//! result into a [`BuildOutcome`]. A build that fails with diagnostics is a
//! normal outcome, not an error: watch mode keeps going and the run
//! supervisor leaves the previous process untouched. Only failure to start
//! the bundler at all surfaces as an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::assemble::BuildConfiguration;
use crate::error::{CliError, Result};
use crate::hooks::{BuildOutcome, OutputFile};

/// Name of the output manifest the bundler writes into the output directory.
pub const METAFILE_NAME: &str = "meta.json";

/// Capability to run one build. The watch coordinator depends on this, not
/// on esbuild directly, so tests can substitute a scripted bundler.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn build(&self, config: &BuildConfiguration) -> Result<BuildOutcome>;
}

/// Production bundler: shells out to esbuild.
pub struct Esbuild {
    executable: PathBuf,
}

impl Esbuild {
    /// Resolve the esbuild executable: project-local installation under
    /// `node_modules/.bin` wins over PATH.
    pub fn resolve(cwd: &Path) -> Self {
        let local = cwd.join("node_modules/.bin/esbuild");
        let executable = if local.is_file() {
            local
        } else {
            PathBuf::from("esbuild")
        };
        Self { executable }
    }

    /// Map a configuration to the esbuild command line.
    pub fn args(config: &BuildConfiguration) -> Vec<String> {
        let mut args: Vec<String> = config
            .entry_points
            .iter()
            .map(|e| e.to_string_lossy().into_owned())
            .collect();

        if config.bundle {
            args.push("--bundle".to_string());
        }
        args.push(format!("--format={}", config.format.as_str()));
        args.push("--platform=node".to_string());
        args.push(format!("--target={}", config.target));
        args.push(format!("--outdir={}", config.out_dir.display()));
        args.push(format!("--out-extension:.js={}", config.out_extension));
        args.push(format!(
            "--metafile={}",
            config.out_dir.join(METAFILE_NAME).display()
        ));

        if config.splitting {
            args.push("--splitting".to_string());
        }
        if config.minify {
            args.push("--minify".to_string());
        }
        if config.sourcemap {
            args.push("--sourcemap".to_string());
        }
        if let Some(tsconfig) = &config.tsconfig {
            args.push(format!("--tsconfig={}", tsconfig.display()));
        }
        for (ext, loader) in &config.loader {
            args.push(format!("--loader:{ext}={loader}"));
        }
        for inject in &config.inject {
            args.push(format!("--inject:{inject}"));
        }
        for plugin in &config.plugins {
            args.extend(plugin.bundler_args());
        }

        args
    }
}

#[async_trait]
impl Bundler for Esbuild {
    async fn build(&self, config: &BuildConfiguration) -> Result<BuildOutcome> {
        let started = Instant::now();

        let output = Command::new(&self.executable)
            .args(Self::args(config))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CliError::Launch {
                program: self.executable.clone(),
                source,
            })?;

        let duration = started.elapsed();

        if !output.status.success() {
            let errors = String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::to_string)
                .collect();
            return Ok(BuildOutcome::failed(errors, duration));
        }

        // esbuild writes warnings to stderr even on success.
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            eprint!("{stderr}");
        }

        let outputs = read_metafile(&config.out_dir.join(METAFILE_NAME)).unwrap_or_else(|e| {
            tracing::warn!("could not read bundler metafile: {e}");
            Vec::new()
        });

        Ok(BuildOutcome {
            success: true,
            errors: Vec::new(),
            duration,
            outputs,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Metafile {
    #[serde(default)]
    outputs: BTreeMap<String, MetaOutput>,
}

#[derive(Debug, Deserialize)]
struct MetaOutput {
    bytes: u64,
}

/// Parse the bundler's output manifest into the emitted-file list.
fn read_metafile(path: &Path) -> Result<Vec<OutputFile>> {
    let raw = std::fs::read_to_string(path)?;
    let metafile: Metafile = serde_json::from_str(&raw)?;
    Ok(metafile
        .outputs
        .into_iter()
        .map(|(path, meta)| OutputFile {
            path: PathBuf::from(path),
            bytes: meta.bytes,
        })
        .collect())
}
