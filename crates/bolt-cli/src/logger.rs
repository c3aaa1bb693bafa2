//! Logging infrastructure built on the `tracing` ecosystem.
//!
//! Verbosity is driven by the global CLI flags: `--verbose` enables debug
//! logging for the bolt crates, `--quiet` restricts output to errors, and the
//! `RUST_LOG` environment variable overrides both defaults.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Call once at program start, before any logging occurs.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging (overrides `quiet`)
/// * `quiet` - Only show error-level logs
/// * `no_color` - Disable colored output
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("bolt_cli=debug,bolt_config=debug")
    } else if quiet {
        EnvFilter::new("bolt_cli=error,bolt_config=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bolt_cli=info,bolt_config=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber is global and can only be installed once per process, so
    // these only exercise filter construction.

    #[test]
    fn test_env_filter_verbose() {
        let _filter = EnvFilter::new("bolt_cli=debug,bolt_config=debug");
    }

    #[test]
    fn test_env_filter_quiet() {
        let _filter = EnvFilter::new("bolt_cli=error,bolt_config=error");
    }
}
