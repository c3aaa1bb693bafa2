//! Terminal output utilities.
//!
//! Status lines, duration/size formatting, and a spinner for the one-shot
//! build. Everything writes to stderr so the supervised program owns stdout.

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

/// Check if color output should be enabled.
///
/// Respects the NO_COLOR and FORCE_COLOR environment variables, falling back
/// to terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// `owo-colors` respects NO_COLOR on its own; this exists for explicit
/// initialization at startup and mirrors the logger setup call.
pub fn init_colors() {
    let _ = should_use_color();
}
