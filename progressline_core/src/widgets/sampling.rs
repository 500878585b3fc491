//! Sampling capability shared by the adaptive widgets

use crate::samples::{DEFAULT_SAMPLES, SampleDelta};
use crate::{ExtraData, ProgressSnapshot, Result};
use log::trace;

/// Records snapshot values into a per-bar [`SampleBuffer`](crate::SampleBuffer)
///
/// The buffer lives in the bar's [`ExtraData`] under
/// `<key_prefix>sample_buffer`, the prefix defaulting to the owning
/// widget's name so two adaptive widgets on one bar keep separate windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sampler {
    samples: usize,
    key_prefix: String,
}

impl Sampler {
    /// Create a sampler namespaced under `widget_name`
    pub fn new(widget_name: &str) -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            key_prefix: format!("{widget_name}_"),
        }
    }

    /// Number of samples kept in the window (at least 1)
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Key of the sample buffer in [`ExtraData`]
    pub fn key(&self) -> String {
        format!("{}sample_buffer", self.key_prefix)
    }

    /// Record the snapshot's value and return the window delta, if any
    ///
    /// Snapshots without a last-update time are not recorded.
    pub fn sample(
        &self,
        snapshot: &ProgressSnapshot,
        extra: &mut ExtraData,
    ) -> Result<Option<SampleDelta>> {
        let key = self.key();
        let buffer = extra.samples_mut(&key, self.samples)?;

        if let Some(time) = snapshot.last_update_time
            && buffer.record(snapshot.value, time)
        {
            trace!("{key}: recorded {} ({} samples)", snapshot.value, buffer.len());
        }

        Ok(buffer.delta())
    }
}
