//! Builder for progress snapshots anchored at a fixed start time

use chrono::{DateTime, Local, TimeDelta};
use progressline_core::ProgressSnapshot;

/// Start time shared by all builders: 2024-01-01 12:00:00 UTC
pub fn fixed_start() -> DateTime<Local> {
    DateTime::from_timestamp(1_704_110_400, 0)
        .expect("fixed timestamp is in range")
        .with_timezone(&Local)
}

/// Builder for [`ProgressSnapshot`]s with deterministic timestamps
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    value: f64,
    min_value: f64,
    max_value: Option<f64>,
    previous_value: Option<f64>,
    elapsed_ms: i64,
    updates: u64,
    finished: bool,
    started: bool,
}

impl SnapshotBuilder {
    /// Running snapshot at value 0 of an open-ended range
    pub fn new() -> Self {
        Self {
            value: 0.0,
            min_value: 0.0,
            max_value: None,
            previous_value: None,
            elapsed_ms: 0,
            updates: 0,
            finished: false,
            started: true,
        }
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn min_value(mut self, min_value: f64) -> Self {
        self.min_value = min_value;
        self
    }

    pub fn max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn previous_value(mut self, previous_value: f64) -> Self {
        self.previous_value = Some(previous_value);
        self
    }

    /// Seconds between start and last update
    pub fn elapsed(mut self, seconds: f64) -> Self {
        self.elapsed_ms = (seconds * 1000.0).round() as i64;
        self
    }

    pub fn updates(mut self, updates: u64) -> Self {
        self.updates = updates;
        self
    }

    /// Mark as finished at the last update time
    pub fn finished(mut self) -> Self {
        self.finished = true;
        self
    }

    /// Drop all timestamps, as for a bar that was never started
    pub fn not_started(mut self) -> Self {
        self.started = false;
        self
    }

    pub fn build(self) -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::new(self.value, self.min_value, self.max_value)
            .with_updates(self.updates);
        if let Some(previous) = self.previous_value {
            snapshot = snapshot.with_previous_value(previous);
        }
        if !self.started {
            return snapshot;
        }

        let start = fixed_start();
        let last_update = start + TimeDelta::milliseconds(self.elapsed_ms);
        snapshot = snapshot.with_times(start, last_update);
        if self.finished {
            snapshot = snapshot.with_end_time(last_update);
        }
        snapshot
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
