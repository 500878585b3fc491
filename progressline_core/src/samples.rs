//! Rolling window of recent progress samples
//!
//! Rate-estimating widgets keep one of these per bar instance inside the
//! bar's [`ExtraData`](crate::ExtraData) and derive a smoothed rate from the
//! two boundary samples instead of the whole history.

use crate::utils::seconds_between;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;

/// Default number of samples kept per window
pub const DEFAULT_SAMPLES: usize = 10;

/// A single recorded `(value, time)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub value: f64,
    pub time: DateTime<Local>,
}

impl Sample {
    pub fn new(value: f64, time: DateTime<Local>) -> Self {
        Self { value, time }
    }
}

/// Change between the oldest and newest sample of a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleDelta {
    pub value: f64,
    pub seconds: f64,
}

impl SampleDelta {
    /// Units per second over the window, `None` when no time has passed
    pub fn rate(&self) -> Option<f64> {
        (self.seconds > 0.0).then(|| self.value / self.seconds)
    }
}

/// Fixed-capacity, oldest-evicting sample window
///
/// Consecutive samples never share a value: recording the value that was
/// recorded last is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl SampleBuffer {
    /// Create an empty buffer holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Record a sample, returning whether it was appended
    pub fn record(&mut self, value: f64, time: DateTime<Local>) -> bool {
        if self.last().is_some_and(|last| last.value == value) {
            return false;
        }

        self.samples.push_back(Sample::new(value, time));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        true
    }

    /// Oldest and newest samples, or `None` with fewer than two samples
    pub fn window(&self) -> Option<(Sample, Sample)> {
        if self.samples.len() < 2 {
            return None;
        }
        let oldest = *self.samples.front()?;
        let newest = *self.samples.back()?;
        Some((oldest, newest))
    }

    /// Value and time covered by the window
    pub fn delta(&self) -> Option<SampleDelta> {
        self.window().map(|(oldest, newest)| SampleDelta {
            value: newest.value - oldest.value,
            seconds: seconds_between(oldest.time, newest.time),
        })
    }

    /// Smoothed rate over the window
    pub fn rate(&self) -> Option<f64> {
        self.delta().and_then(|delta| delta.rate())
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn at(base: DateTime<Local>, seconds: i64) -> DateTime<Local> {
        base + TimeDelta::seconds(seconds)
    }

    #[test]
    fn test_record_skips_repeated_value() {
        let base = Local::now();
        let mut buffer = SampleBuffer::new(5);

        assert!(buffer.record(1.0, at(base, 0)));
        assert!(!buffer.record(1.0, at(base, 1)));
        assert!(buffer.record(2.0, at(base, 2)));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_record_evicts_oldest() {
        let base = Local::now();
        let mut buffer = SampleBuffer::new(3);

        for step in 0..5 {
            buffer.record(step as f64, at(base, step));
        }

        let values: Vec<f64> = buffer.iter().map(|sample| sample.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_window_needs_two_samples() {
        let base = Local::now();
        let mut buffer = SampleBuffer::default();

        assert!(buffer.window().is_none());
        buffer.record(10.0, at(base, 0));
        assert!(buffer.window().is_none());
        buffer.record(30.0, at(base, 4));

        let (oldest, newest) = buffer.window().unwrap();
        assert_eq!(oldest.value, 10.0);
        assert_eq!(newest.value, 30.0);
        assert_eq!(buffer.rate(), Some(5.0));
    }

    #[test]
    fn test_rate_undefined_without_elapsed_time() {
        let base = Local::now();
        let mut buffer = SampleBuffer::default();
        buffer.record(1.0, base);
        buffer.record(2.0, base);

        assert!(buffer.delta().is_some());
        assert_eq!(buffer.rate(), None);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = SampleBuffer::new(0);
        buffer.record(1.0, Local::now());
        buffer.record(2.0, Local::now());

        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_buffer_is_bounded_and_deduplicated(
            capacity in 1usize..16,
            values in prop::collection::vec(0u8..6, 0..64),
        ) {
            let base = Local::now();
            let mut buffer = SampleBuffer::new(capacity);

            for (step, value) in values.iter().enumerate() {
                buffer.record(f64::from(*value), at(base, step as i64));
                prop_assert!(buffer.len() <= capacity);
            }

            let recorded: Vec<f64> = buffer.iter().map(|sample| sample.value).collect();
            for pair in recorded.windows(2) {
                prop_assert_ne!(pair[0], pair[1]);
            }
        }
    }
}
