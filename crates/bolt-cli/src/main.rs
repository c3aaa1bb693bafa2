//! Bolt - build, watch, and run Node.js TypeScript projects.
//!
//! Entry point: argument parsing, logging initialization, project-settings
//! resolution, and dispatch to the one-shot build or the watch session.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::Result;

use bolt_cli::{assemble, bundler, cli, commands, error, logger, ui};
use bolt_config::ProjectSettings;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    run(args).await.map_err(error::into_report)
}

async fn run(args: cli::Cli) -> bolt_cli::Result<ExitCode> {
    if !args.entry.is_file() {
        return Err(bolt_cli::CliError::EntryNotFound(args.entry));
    }

    let cwd = PathBuf::from(".");
    let settings = ProjectSettings::resolve(&cwd)?;
    let mut config = assemble::assemble(&args.entry, &args, &settings)?;
    let esbuild = bundler::Esbuild::resolve(&cwd);

    if args.watch {
        commands::watch_execute(&mut config, &esbuild, cwd).await?;
        Ok(ExitCode::SUCCESS)
    } else {
        let exit = commands::build_execute(&mut config, &esbuild).await?;
        // A supervised program's exit code becomes ours.
        Ok(match exit {
            Some(code) => ExitCode::from(code.clamp(0, 255) as u8),
            None => ExitCode::SUCCESS,
        })
    }
}
