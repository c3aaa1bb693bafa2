//! Command-line interface definition for Bolt.
//!
//! Bolt is a single-command tool: one entry file plus switches. The option
//! set is parsed once at startup and read-only afterwards.

use std::path::PathBuf;

use clap::Parser;

/// Bolt - build, watch, and run Node.js TypeScript projects
#[derive(Parser, Debug)]
#[command(
    name = "bolt",
    version,
    about = "Build, watch, and run Node.js TypeScript projects",
    long_about = "Bolt bundles a TypeScript entry point with esbuild using settings derived\n\
                  from package.json. In watch mode it rebuilds on file changes, runs the\n\
                  TypeScript checker alongside, and can supervise the bundled program,\n\
                  restarting it exactly once per successful rebuild."
)]
pub struct Cli {
    /// Entry file to bundle
    ///
    /// The source file the bundler starts dependency-graph traversal from,
    /// e.g. `src/app.ts`.
    #[arg(value_name = "ENTRY")]
    pub entry: PathBuf,

    /// Rebuild on file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Run the bundled program after each successful build
    ///
    /// Without a value the primary entry's output file is run. With a value
    /// that file is run instead. In watch mode the program is restarted after
    /// every successful rebuild.
    #[arg(short, long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    pub run: Option<String>,

    /// Terminate the supervised program cooperatively (SIGTERM)
    ///
    /// By default the program is killed forcefully (SIGKILL) so a hung
    /// process can never delay the next rebuild. With --grace the program
    /// may intercept the signal for cleanup.
    #[arg(long)]
    pub grace: bool,

    /// Clean the output directory before building
    ///
    /// Skipped when the output directory is the current working directory.
    #[arg(long)]
    pub clean: bool,

    /// Minify the output
    #[arg(short = 'm', long)]
    pub minify: bool,

    /// Generate source maps
    #[arg(long)]
    pub sourcemap: bool,

    /// Skip the TypeScript checker in watch mode
    #[arg(long)]
    pub ignore_types: bool,

    /// Clear the terminal before each rebuild status line
    #[arg(long)]
    pub reset: bool,

    /// Path to a tsconfig.json for the bundler and the type checker
    #[arg(long, value_name = "FILE")]
    pub tsconfig: Option<PathBuf>,

    /// Extra options passed to the node runtime when running
    ///
    /// A single whitespace-separated string, e.g.
    /// --node-options "--enable-source-maps --max-old-space-size=4096"
    // Every real node option starts with a hyphen, so the value must be
    // accepted verbatim instead of being parsed as a flag.
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub node_options: Option<String>,

    /// Additional entry bundled and loaded via --import before the program
    ///
    /// May be repeated. Each file becomes its own entry point and a matching
    /// `--import <output>` flag on the supervised process, in order.
    #[arg(long, value_name = "FILE")]
    pub import: Vec<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Whether the run plugin is requested, regardless of target form.
    pub fn run_requested(&self) -> bool {
        self.run.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::parse_from(["bolt", "src/app.ts"]);
        assert_eq!(cli.entry, PathBuf::from("src/app.ts"));
        assert!(!cli.watch);
        assert!(!cli.run_requested());
    }

    #[test]
    fn test_run_without_value() {
        let cli = Cli::parse_from(["bolt", "src/app.ts", "--run"]);
        assert_eq!(cli.run.as_deref(), Some(""));
        assert!(cli.run_requested());
    }

    #[test]
    fn test_run_with_value() {
        let cli = Cli::parse_from(["bolt", "src/app.ts", "--run", "dist/server.mjs"]);
        assert_eq!(cli.run.as_deref(), Some("dist/server.mjs"));
    }

    #[test]
    fn test_repeated_imports_preserve_order() {
        let cli = Cli::parse_from([
            "bolt",
            "src/app.ts",
            "--import",
            "polyfill.ts",
            "--import",
            "tracing.ts",
        ]);
        assert_eq!(cli.import, vec!["polyfill.ts", "tracing.ts"]);
    }

    #[test]
    fn test_node_options_accept_hyphenated_values() {
        let cli = Cli::parse_from([
            "bolt",
            "src/app.ts",
            "--node-options",
            "--enable-source-maps --max-old-space-size=4096",
        ]);
        assert_eq!(
            cli.node_options.as_deref(),
            Some("--enable-source-maps --max-old-space-size=4096")
        );
    }

    #[test]
    fn test_verbose_quiet_conflict() {
        let result = Cli::try_parse_from(["bolt", "src/app.ts", "-v", "-q"]);
        assert!(result.is_err());
    }
}
