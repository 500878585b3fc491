//! Time-based widgets: elapsed timer and ETA estimates

use super::{FixedWidget, Sampler};
use crate::error::FormatError;
use crate::format::{Template, describe_fields};
use crate::utils::format_time;
use crate::{ExtraData, ProgressSnapshot, Result};

pub const DEFAULT_TIMER_FORMAT: &str = "Elapsed Time: {time_elapsed}";
pub const DEFAULT_ETA_FORMAT: &str = "ETA: {eta}";
pub const DEFAULT_FINISHED_FORMAT: &str = "Time: {elapsed}";
pub const ETA_NOT_STARTED: &str = "ETA:  --:--:--";

/// Displays the elapsed time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    format: Template,
}

impl Timer {
    pub fn new() -> Self {
        Self::with_format(DEFAULT_TIMER_FORMAT)
    }

    pub fn with_format(format: impl Into<Template>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for Timer {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        self.format.render(&snapshot.fields())
    }
}

/// Estimates the remaining time from the average rate since start
///
/// Shows a placeholder until the value moves off its minimum and the total
/// time once the bar has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eta {
    format: Template,
    finished_format: Template,
}

impl Eta {
    pub fn new() -> Self {
        Self {
            format: Template::new(DEFAULT_ETA_FORMAT),
            finished_format: Template::new(DEFAULT_FINISHED_FORMAT),
        }
    }

    /// Template used while running; `{eta}` holds the estimate
    pub fn with_format(mut self, format: impl Into<Template>) -> Self {
        self.format = format.into();
        self
    }

    /// Template used once finished; `{elapsed}` holds the total time
    pub fn with_finished_format(mut self, format: impl Into<Template>) -> Self {
        self.finished_format = format.into();
        self
    }

    /// Render from a `(value, seconds)` progress measurement, falling back
    /// to the totals since start when `window` is `None`
    fn render_with_window(
        &self,
        snapshot: &ProgressSnapshot,
        window: Option<(f64, f64)>,
    ) -> Result<String> {
        if snapshot.value == snapshot.min_value {
            return Ok(ETA_NOT_STARTED.to_string());
        }

        let mut fields = snapshot.fields();
        let elapsed = snapshot.elapsed.total_seconds;

        if snapshot.is_finished() {
            fields.insert("elapsed".to_string(), format_time(elapsed).into());
            return self.finished_format.render(&fields);
        }

        let Some(max) = snapshot.max_value else {
            return Err(FormatError::missing_field(
                self.format.as_str(),
                "max_value",
                describe_fields(&fields),
            )
            .into());
        };

        let (value, seconds) = window.unwrap_or((snapshot.value, elapsed));
        if !(value > 0.0 && seconds > 0.0) {
            return Ok(ETA_NOT_STARTED.to_string());
        }

        let eta = seconds * max / value - seconds;
        if !eta.is_finite() {
            return Ok(ETA_NOT_STARTED.to_string());
        }
        fields.insert("eta".to_string(), format_time(eta.max(0.0)).into());
        self.format.render(&fields)
    }
}

impl Default for Eta {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for Eta {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        self.render_with_window(snapshot, None)
    }
}

/// ETA computed from the rate over the most recent samples
///
/// Smooths the estimate for bursty progress and for bars resumed halfway.
/// With fewer than two samples it renders exactly like [`Eta`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveEta {
    eta: Eta,
    sampler: Sampler,
}

impl AdaptiveEta {
    pub fn new() -> Self {
        Self {
            eta: Eta::new(),
            sampler: Sampler::new("AdaptiveEta"),
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.sampler = self.sampler.with_samples(samples);
        self
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.sampler = self.sampler.with_key_prefix(key_prefix);
        self
    }

    pub fn with_eta(mut self, eta: Eta) -> Self {
        self.eta = eta;
        self
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}

impl Default for AdaptiveEta {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for AdaptiveEta {
    fn render(&self, snapshot: &ProgressSnapshot, extra: &mut ExtraData) -> Result<String> {
        let window = self
            .sampler
            .sample(snapshot, extra)?
            .filter(|delta| delta.seconds > 0.0)
            .map(|delta| (delta.value, delta.seconds));
        self.eta.render_with_window(snapshot, window)
    }
}
