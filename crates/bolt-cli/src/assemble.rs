//! Configuration assembly: CLI options + project settings -> bundler config.
//!
//! A pure mapping apart from the optional output-directory clean. The
//! resulting [`BuildConfiguration`] is constructed once per invocation; watch
//! mode reuses the same instance across every rebuild.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bolt_config::{clean_dir, is_current_dir, output_filename, Format, ProjectSettings};

use crate::cli::Cli;
use crate::error::Result;
use crate::plugins::{
    ExternalsPlugin, KillSignal, Plugin, PolyfillPlugin, ProcessSupervisor, ProgressReporter,
    RunCommand, TypeCheckPlugin,
};

/// The configuration handed to the bundler.
pub struct BuildConfiguration {
    /// The primary entry plus every `--import` file, in order. Imports are
    /// listed after the primary entry but execute before its side effects at
    /// runtime, consistent with module evaluation order.
    pub entry_points: Vec<PathBuf>,
    pub bundle: bool,
    pub inject: Vec<String>,
    pub target: String,
    pub out_dir: PathBuf,
    pub out_extension: String,
    pub format: Format,
    /// Chunk splitting; forced on by the esm format.
    pub splitting: bool,
    pub minify: bool,
    pub sourcemap: bool,
    pub tsconfig: Option<PathBuf>,
    pub loader: BTreeMap<String, String>,
    /// Plugins in registration order; hooks dispatch in this order.
    pub plugins: Vec<Plugin>,
}

/// Assemble the bundler configuration.
///
/// Rules applied in order: kill-signal selection, conditional output clean,
/// plugin registration (polyfills, externals, watch-only type check and
/// progress, run supervision last), entry-point collection, run-target and
/// node-option resolution, format-driven splitting.
///
/// # Errors
///
/// Only the directory clean can fail; the mapping itself is total.
pub fn assemble(entry: &Path, options: &Cli, settings: &ProjectSettings) -> Result<BuildConfiguration> {
    let kill_signal = if options.grace {
        KillSignal::Grace
    } else {
        KillSignal::Force
    };

    // Never clean the directory the process is running from.
    if options.clean && !is_current_dir(&settings.out_dir) {
        clean_dir(&settings.out_dir)?;
    }

    let mut plugins: Vec<Plugin> = settings
        .polyfills
        .iter()
        .map(|p| Plugin::Polyfill(PolyfillPlugin::new(p.clone())))
        .collect();

    plugins.push(Plugin::Externals(ExternalsPlugin::new(
        settings.externals.clone(),
    )));

    if options.watch {
        if !options.ignore_types {
            plugins.push(Plugin::TypeCheck(TypeCheckPlugin::new(
                PathBuf::from("."),
                options.tsconfig.clone(),
            )));
        }
        plugins.push(Plugin::Progress(ProgressReporter::new(options.reset)));
    }

    if let Some(run) = &options.run {
        let program = if run.is_empty() {
            output_filename(entry, &settings.out_dir, &settings.out_extension)
        } else {
            PathBuf::from(run)
        };

        let mut node_options: Vec<String> = options
            .node_options
            .as_deref()
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        for import in &options.import {
            node_options.push("--import".to_string());
            node_options.push(
                output_filename(Path::new(import), &settings.out_dir, &settings.out_extension)
                    .to_string_lossy()
                    .into_owned(),
            );
        }

        // Registered last so it observes the final, fully-linked artifact.
        plugins.push(Plugin::Run(ProcessSupervisor::new(
            RunCommand {
                program,
                node_options,
            },
            kill_signal,
        )));
    }

    let mut entry_points = vec![entry.to_path_buf()];
    entry_points.extend(options.import.iter().map(PathBuf::from));

    Ok(BuildConfiguration {
        entry_points,
        bundle: true,
        inject: settings.inject.clone(),
        target: settings.target.clone(),
        out_dir: settings.out_dir.clone(),
        out_extension: settings.out_extension.clone(),
        format: settings.format,
        splitting: settings.format == Format::Esm,
        minify: options.minify,
        sourcemap: options.sourcemap,
        tsconfig: options.tsconfig.clone(),
        loader: settings.loader.clone(),
        plugins,
    })
}
