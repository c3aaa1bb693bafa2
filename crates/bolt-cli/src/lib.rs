//! Bolt CLI - build, watch, and run Node.js TypeScript projects.
//!
//! Bolt assembles an invocation of the external `esbuild` bundler from a
//! project's `package.json` and a set of CLI switches, and in watch mode
//! supervises the bundled program across rebuilds: the user's process is
//! restarted exactly once per successful rebuild, with the replacement never
//! launched before its predecessor has confirmed exit.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line flags (clap)
//! - [`assemble`] - Maps flags + project settings to a [`assemble::BuildConfiguration`]
//! - [`bundler`] - The external-bundler boundary
//! - [`hooks`] - Build lifecycle hook interface shared by all plugins
//! - [`plugins`] - Externals, polyfills, type checking, progress, and the
//!   run supervisor (the component that owns the child process lifecycle)
//! - [`watch`] - File watching with debouncing
//! - `commands` - One-shot build and watch-session drivers
//! - [`error`], [`logger`], [`ui`] - Error taxonomy, tracing setup, terminal output

pub mod assemble;
pub mod bundler;
pub mod cli;
pub mod commands;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod plugins;
pub mod ui;
pub mod watch;

pub use error::{CliError, Result};
