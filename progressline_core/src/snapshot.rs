//! Read-only progress state handed to widgets on every render

use crate::format::{FieldValue, Fields};
use crate::utils::{format_time, seconds_between};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Lifecycle of a bar instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarState {
    NotStarted,
    Running,
    Finished,
}

/// Elapsed time split into calendar-style components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Elapsed {
    pub total_seconds: f64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Elapsed {
    pub fn from_seconds(total_seconds: f64) -> Self {
        let total_seconds = if total_seconds.is_finite() {
            total_seconds.max(0.0)
        } else {
            0.0
        };
        let whole = total_seconds as u64;

        Self {
            total_seconds,
            days: whole / 86_400,
            hours: (whole / 3600) % 24,
            minutes: (whole / 60) % 60,
            seconds: whole % 60,
        }
    }
}

/// Progress state for a single render pass
///
/// The driver builds one of these per render; widgets only read it. Any
/// state a widget needs across renders lives in the bar's
/// [`ExtraData`](crate::ExtraData) instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub value: f64,
    pub min_value: f64,
    pub max_value: Option<f64>,
    pub previous_value: Option<f64>,
    pub start_time: Option<DateTime<Local>>,
    pub last_update_time: Option<DateTime<Local>>,
    pub end_time: Option<DateTime<Local>>,
    pub updates: u64,
    pub elapsed: Elapsed,
    pub percentage: Option<f64>,
}

impl ProgressSnapshot {
    /// Snapshot of a bar that has no timing information yet
    pub fn new(value: f64, min_value: f64, max_value: Option<f64>) -> Self {
        Self {
            value,
            min_value,
            max_value,
            previous_value: None,
            start_time: None,
            last_update_time: None,
            end_time: None,
            updates: 0,
            elapsed: Elapsed::default(),
            percentage: percentage(value, min_value, max_value),
        }
    }

    /// Set start and last-update times, recomputing elapsed time
    pub fn with_times(mut self, start: DateTime<Local>, last_update: DateTime<Local>) -> Self {
        self.start_time = Some(start);
        self.last_update_time = Some(last_update);
        self.refresh_elapsed();
        self
    }

    /// Mark the snapshot as finished at `end`
    pub fn with_end_time(mut self, end: DateTime<Local>) -> Self {
        self.end_time = Some(end);
        self.refresh_elapsed();
        self
    }

    pub fn with_updates(mut self, updates: u64) -> Self {
        self.updates = updates;
        self
    }

    pub fn with_previous_value(mut self, previous: f64) -> Self {
        self.previous_value = Some(previous);
        self
    }

    /// Override the elapsed time directly, for snapshots without timestamps
    pub fn with_elapsed_seconds(mut self, seconds: f64) -> Self {
        self.elapsed = Elapsed::from_seconds(seconds);
        self
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn state(&self) -> BarState {
        if self.end_time.is_some() {
            BarState::Finished
        } else if self.start_time.is_some() {
            BarState::Running
        } else {
            BarState::NotStarted
        }
    }

    /// Standard template fields derived from this snapshot
    ///
    /// Optional attributes (max value, end time, ...) are only present when
    /// known, so templates referencing them fail with a missing-field error.
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::new();
        let mut set = |name: &str, value: FieldValue| {
            fields.insert(name.to_string(), value);
        };

        set("value", self.value.into());
        set("min_value", self.min_value.into());
        set("updates", self.updates.into());
        set("total_seconds_elapsed", self.elapsed.total_seconds.into());
        set("seconds_elapsed", self.elapsed.seconds.into());
        set("minutes_elapsed", self.elapsed.minutes.into());
        set("hours_elapsed", self.elapsed.hours.into());
        set("days_elapsed", self.elapsed.days.into());
        set("time_elapsed", format_time(self.elapsed.total_seconds).into());

        if let Some(max) = self.max_value {
            set("max_value", max.into());
        }
        if let Some(previous) = self.previous_value {
            set("previous_value", previous.into());
        }
        if let Some(percentage) = self.percentage {
            set("percentage", percentage.into());
        }
        if let Some(start) = self.start_time {
            set("start_time", start.into());
        }
        if let Some(last_update) = self.last_update_time {
            set("last_update_time", last_update.into());
        }
        if let Some(end) = self.end_time {
            set("end_time", end.into());
        }

        fields
    }

    fn refresh_elapsed(&mut self) {
        let until = self.end_time.or(self.last_update_time);
        if let (Some(start), Some(until)) = (self.start_time, until) {
            self.elapsed = Elapsed::from_seconds(seconds_between(start, until));
        }
    }
}

/// Percentage done, `None` when the maximum is unknown
///
/// An empty range (`max == min`) counts as complete.
pub fn percentage(value: f64, min_value: f64, max_value: Option<f64>) -> Option<f64> {
    let max = max_value?;
    let span = max - min_value;
    if span <= 0.0 {
        return Some(100.0);
    }
    Some((value - min_value) * 100.0 / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3.0, 0.0, Some(10.0)), Some(30.0));
        assert_eq!(percentage(15.0, 10.0, Some(20.0)), Some(50.0));
        assert_eq!(percentage(0.0, 0.0, Some(0.0)), Some(100.0));
        assert_eq!(percentage(3.0, 0.0, None), None);
    }

    #[test]
    fn test_elapsed_decomposition() {
        let elapsed = Elapsed::from_seconds(90_061.5);

        assert_eq!(elapsed.days, 1);
        assert_eq!(elapsed.hours, 1);
        assert_eq!(elapsed.minutes, 1);
        assert_eq!(elapsed.seconds, 1);
        assert_eq!(elapsed.total_seconds, 90_061.5);
    }

    #[test]
    fn test_times_drive_elapsed() {
        let start = Local::now();
        let snapshot = ProgressSnapshot::new(5.0, 0.0, Some(10.0))
            .with_times(start, start + TimeDelta::seconds(75));

        assert_eq!(snapshot.elapsed.total_seconds, 75.0);
        assert_eq!(snapshot.state(), BarState::Running);

        let finished = snapshot.with_end_time(start + TimeDelta::seconds(80));
        assert_eq!(finished.elapsed.total_seconds, 80.0);
        assert_eq!(finished.state(), BarState::Finished);
    }

    #[test]
    fn test_fields_include_known_attributes_only() {
        let snapshot = ProgressSnapshot::new(4.0, 0.0, None).with_elapsed_seconds(3725.0);
        let fields = snapshot.fields();

        assert_eq!(fields["value"], FieldValue::Float(4.0));
        assert_eq!(fields["time_elapsed"], FieldValue::Text("1:02:05".into()));
        assert_eq!(fields["minutes_elapsed"], FieldValue::Int(2));
        assert!(!fields.contains_key("max_value"));
        assert!(!fields.contains_key("percentage"));
        assert!(!fields.contains_key("end_time"));
    }
}
