//! Project settings resolution for the bolt build tool.
//!
//! This crate answers the questions a build invocation needs to ask about the
//! surrounding Node.js project before any bundling starts:
//!
//! - [`settings`] - Reads `package.json` once and derives output destination,
//!   module format, runtime target, external-package allowlist, loader map,
//!   inject list, and polyfill list
//! - [`paths`] - Output filename resolution and working-directory checks
//! - [`clean`] - Output directory cleaning
//!
//! Everything here is deterministic, stateless mapping; the interesting
//! lifecycle work lives in `bolt-cli`.

pub mod clean;
pub mod error;
pub mod paths;
pub mod settings;

pub use clean::clean_dir;
pub use error::{ConfigError, Result};
pub use paths::{is_current_dir, output_filename};
pub use settings::{Format, ProjectSettings};
