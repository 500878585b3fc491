//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::stderr;

/// Width used when nothing better is known
pub const FALLBACK_WIDTH: usize = 80;

/// Check if the terminal understands ANSI escape codes
pub fn supports_ansi() -> bool {
    if !stderr_is_terminal() || is_ci_environment() {
        return false;
    }

    term_supports_ansi(&env::var("TERM").unwrap_or_default())
}

/// Whether a `TERM` value names an ANSI-capable terminal
pub fn term_supports_ansi(term: &str) -> bool {
    if cfg!(windows) {
        return term != "dumb";
    }
    !(term == "dumb" || term.is_empty())
}

/// Check if stderr is connected to a terminal (for progress display)
pub fn stderr_is_terminal() -> bool {
    stderr().is_terminal()
}

/// Detect if running in a CI environment
pub fn is_ci_environment() -> bool {
    ci_detected(|var| env::var_os(var).is_some())
}

fn ci_detected(is_set: impl Fn(&str) -> bool) -> bool {
    let ci_vars = [
        "CI",
        "CONTINUOUS_INTEGRATION",
        "JENKINS_URL",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "TRAVIS",
        "CIRCLECI",
        "BUILDKITE",
        "DRONE",
        "TEAMCITY_VERSION",
        "TF_BUILD", // Azure DevOps
    ];

    ci_vars.iter().any(|var| is_set(var))
}

/// Parse a `COLUMNS`-style value
pub fn parse_columns(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|&columns| columns > 0)
}

/// Line width for progress output
///
/// An explicit width wins; otherwise `COLUMNS` is consulted, then
/// [`FALLBACK_WIDTH`]. One column is kept free so the cursor never wraps.
pub fn line_width(explicit: Option<usize>) -> usize {
    if let Some(width) = explicit.filter(|&width| width > 0) {
        return width;
    }

    env::var("COLUMNS")
        .ok()
        .and_then(|value| parse_columns(&value))
        .map(|columns| columns.saturating_sub(1).max(1))
        .unwrap_or(FALLBACK_WIDTH)
}
