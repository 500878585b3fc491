//! Utility functions for time formatting and character-width handling
//!
//! Widths throughout the crate are counted in `char`s, not bytes.

use chrono::{DateTime, Local};

/// Format a number of seconds as `H:MM:SS`
///
/// Fractional seconds are dropped and hours are not wrapped into days.
/// Negative or non-finite input renders as `0:00:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Seconds elapsed from `from` to `to`, negative when `to` is earlier
pub fn seconds_between(from: DateTime<Local>, to: DateTime<Local>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keep at most `width` characters of `text`
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Pad `text` with `fill` up to `width` characters
///
/// Text is left-justified when `fill_left` is set (padding goes on the right),
/// right-justified otherwise. Text longer than `width` is returned unchanged.
pub fn justify(text: &str, width: usize, fill: char, fill_left: bool) -> String {
    let len = char_len(text);
    if len >= width {
        return text.to_string();
    }

    let padding: String = std::iter::repeat_n(fill, width - len).collect();
    if fill_left {
        format!("{text}{padding}")
    } else {
        format!("{padding}{text}")
    }
}

/// Pad or truncate `text` so that it is exactly `width` characters
pub fn fit(text: &str, width: usize) -> String {
    justify(&truncate(text, width), width, ' ', true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00:00");
        assert_eq!(format_time(59.9), "0:00:59");
        assert_eq!(format_time(61.0), "0:01:01");
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(3725.0), "1:02:05");
        assert_eq!(format_time(90_000.0), "25:00:00");
    }

    #[test]
    fn test_format_time_degenerate_input() {
        assert_eq!(format_time(-5.0), "0:00:00");
        assert_eq!(format_time(f64::NAN), "0:00:00");
        assert_eq!(format_time(f64::INFINITY), "0:00:00");
    }

    #[test]
    fn test_seconds_between() {
        let start = Local::now();
        let later = start + TimeDelta::milliseconds(2500);

        assert!((seconds_between(start, later) - 2.5).abs() < 1e-9);
        assert!((seconds_between(later, start) + 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_justify() {
        assert_eq!(justify("##", 5, ' ', true), "##   ");
        assert_eq!(justify("##", 5, '-', false), "---##");
        assert_eq!(justify("#####", 3, ' ', true), "#####");
    }

    #[test]
    fn test_fit_counts_chars_not_bytes() {
        assert_eq!(fit("█▒", 4), "█▒  ");
        assert_eq!(fit("█▒█▒", 2), "█▒");
        assert_eq!(char_len("█▒"), 2);
    }
}
