//! Transfer speed widgets with binary (1024-based) unit prefixes

use super::{FixedWidget, Sampler};
use crate::error::ValidationError;
use crate::format::Template;
use crate::{ExtraData, ProgressSnapshot, Result};

pub const DEFAULT_SPEED_FORMAT: &str = "{scaled:5.1f} {prefix}{unit}";
pub const DEFAULT_UNIT: &str = "B";
pub const DEFAULT_PREFIXES: [&str; 9] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi", "Yi"];

/// Below this, values and durations count as zero
const EPSILON: f64 = 2e-6;

/// Scale `speed` into the largest of `levels` powers of 1024 it reaches
///
/// Returns `(scaled, power)` with `scaled * 1024^power == speed`. Speeds
/// past the last level stay on the last level with a large `scaled`.
pub fn scale_speed(speed: f64, levels: usize) -> (f64, usize) {
    if !(speed.is_finite() && speed > 0.0) || levels == 0 {
        return (0.0, 0);
    }

    let power = ((speed.log2() / 10.0).floor().max(0.0) as usize).min(levels - 1);
    let scaled = speed / 1024f64.powi(power as i32);
    (scaled, power)
}

/// Shows `value / elapsed` as a prefixed unit per second-style figure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransferSpeed {
    format: Template,
    unit: String,
    prefixes: Vec<String>,
}

impl FileTransferSpeed {
    pub fn new() -> Self {
        Self {
            format: Template::new(DEFAULT_SPEED_FORMAT),
            unit: DEFAULT_UNIT.to_string(),
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Template with `{scaled}`, `{prefix}` and `{unit}` on top of the snapshot fields
    pub fn with_format(mut self, format: impl Into<Template>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Replace the prefix table; the first entry is used for unscaled values
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.is_empty() {
            return Err(
                ValidationError::invalid_configuration("prefix table must not be empty").into(),
            );
        }
        self.prefixes = prefixes;
        Ok(self)
    }

    /// Scaled speed and its prefix for `value` units over `elapsed` seconds
    pub fn scale(&self, value: f64, elapsed: f64) -> (f64, &str) {
        let (scaled, power) = if value > EPSILON && elapsed > EPSILON {
            scale_speed(value / elapsed, self.prefixes.len())
        } else {
            (0.0, 0)
        };
        (scaled, self.prefixes[power].as_str())
    }

    fn render_speed(&self, snapshot: &ProgressSnapshot, value: f64, elapsed: f64) -> Result<String> {
        let (scaled, prefix) = self.scale(value, elapsed);

        let mut fields = snapshot.fields();
        fields.insert("scaled".to_string(), scaled.into());
        fields.insert("prefix".to_string(), prefix.into());
        fields.insert("unit".to_string(), self.unit.as_str().into());
        self.format.render(&fields)
    }
}

impl Default for FileTransferSpeed {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for FileTransferSpeed {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        self.render_speed(snapshot, snapshot.value, snapshot.elapsed.total_seconds)
    }
}

/// Transfer speed over the most recent samples
///
/// With fewer than two samples it renders exactly like [`FileTransferSpeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveTransferSpeed {
    speed: FileTransferSpeed,
    sampler: Sampler,
}

impl AdaptiveTransferSpeed {
    pub fn new() -> Self {
        Self {
            speed: FileTransferSpeed::new(),
            sampler: Sampler::new("AdaptiveTransferSpeed"),
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

    pub fn with_speed(mut self, speed: FileTransferSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}

impl Default for AdaptiveTransferSpeed {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for AdaptiveTransferSpeed {
    fn render(&self, snapshot: &ProgressSnapshot, extra: &mut ExtraData) -> Result<String> {
        match self.sampler.sample(snapshot, extra)? {
            Some(delta) => self.speed.render_speed(snapshot, delta.value, delta.seconds),
            None => self.speed.render_speed(
                snapshot,
                snapshot.value,
                snapshot.elapsed.total_seconds,
            ),
        }
    }
}
