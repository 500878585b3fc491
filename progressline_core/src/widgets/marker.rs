//! Spinning marker

use super::{ElasticWidget, FixedWidget};
use crate::error::ValidationError;
use crate::{ExtraData, ProgressSnapshot, Result};

pub const DEFAULT_MARKERS: &str = "|/-\\";

/// Cycles through glyphs on every update, freezing once finished
///
/// Ignores any assigned width, so it can stand alone in a line or act as
/// the marker of a [`Bar`](super::Bar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedMarker {
    markers: Vec<char>,
    default: char,
}

impl AnimatedMarker {
    pub fn new() -> Self {
        Self {
            markers: DEFAULT_MARKERS.chars().collect(),
            default: '|',
        }
    }

    /// Cycle through the characters of `markers`; the first one becomes the
    /// finished glyph
    pub fn with_markers(markers: &str) -> Result<Self> {
        let markers: Vec<char> = markers.chars().collect();
        let Some(&first) = markers.first() else {
            return Err(
                ValidationError::invalid_configuration("animated marker needs at least one glyph")
                    .into(),
            );
        };

        Ok(Self {
            markers,
            default: first,
        })
    }

    /// Glyph shown once the bar has finished
    pub fn with_default(mut self, default: char) -> Self {
        self.default = default;
        self
    }

    pub fn glyph(&self, snapshot: &ProgressSnapshot) -> char {
        if snapshot.is_finished() {
            return self.default;
        }
        let index = (snapshot.updates % self.markers.len() as u64) as usize;
        self.markers[index]
    }
}

impl Default for AnimatedMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for AnimatedMarker {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        Ok(self.glyph(snapshot).to_string())
    }
}

impl ElasticWidget for AnimatedMarker {
    fn render(
        &self,
        snapshot: &ProgressSnapshot,
        _extra: &mut ExtraData,
        _width: usize,
    ) -> Result<String> {
        Ok(self.glyph(snapshot).to_string())
    }
}
