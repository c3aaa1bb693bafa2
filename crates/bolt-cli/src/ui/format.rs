//! Formatting utilities for sizes, durations, and build summaries.

use std::time::Duration;

use owo_colors::OwoColorize;

/// Format file size in human-readable form (B, KB, MB, GB).
///
/// # Examples
///
/// ```
/// use bolt_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration in human-readable form (ms, s, m:s).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bolt_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print a summary of build outputs to stderr.
///
/// One line per emitted file with its size, plus a total.
pub fn print_build_summary(entries: &[(String, u64)], duration: Duration) {
    for (name, size) in entries {
        eprintln!(
            "  {} {} {}",
            "▸".blue(),
            name.bold(),
            format_size(*size).dimmed()
        );
    }

    let total: u64 = entries.iter().map(|(_, s)| s).sum();
    eprintln!(
        "  {} {} in {}",
        "Total:".bold(),
        format_size(total).green(),
        format_duration(duration).green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(format_size(1_048_576), "1.00 MB");
    }

    #[test]
    fn test_format_duration_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
    }

    #[test]
    fn test_print_build_summary() {
        // Should not panic, including on empty input
        print_build_summary(
            &[("app.mjs".to_string(), 15_234)],
            Duration::from_millis(450),
        );
        print_build_summary(&[], Duration::from_millis(1));
    }
}
