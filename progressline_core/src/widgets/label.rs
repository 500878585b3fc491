//! Template-driven text widgets: counters, percentages and labels

use super::FixedWidget;
use crate::format::{FieldValue, Template};
use crate::utils::format_time;
use crate::{ExtraData, ProgressSnapshot, Result};
use log::trace;

pub const DEFAULT_COUNTER_FORMAT: &str = "{value:d}";
pub const DEFAULT_PERCENTAGE_FORMAT: &str = "{percentage:3d}%";
pub const DEFAULT_UNKNOWN_PERCENTAGE: &str = "N/A%";
pub const DEFAULT_SIMPLE_PROGRESS_FORMAT: &str = "{value:d} of {max_value:d}";

/// Displays the current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    format: Template,
}

impl Counter {
    pub fn new() -> Self {
        Self::with_format(DEFAULT_COUNTER_FORMAT)
    }

    pub fn with_format(format: impl Into<Template>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for Counter {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        self.format.render(&snapshot.fields())
    }
}

/// Displays the percentage done
///
/// Bars without a known maximum have no percentage; they render the
/// `unknown` text instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Percentage {
    format: Template,
    unknown: String,
}

impl Percentage {
    pub fn new() -> Self {
        Self {
            format: Template::new(DEFAULT_PERCENTAGE_FORMAT),
            unknown: DEFAULT_UNKNOWN_PERCENTAGE.to_string(),
        }
    }

    pub fn with_format(mut self, format: impl Into<Template>) -> Self {
        self.format = format.into();
        self
    }

    /// Text shown when the maximum value is unknown
    pub fn with_unknown(mut self, unknown: impl Into<String>) -> Self {
        self.unknown = unknown.into();
        self
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for Percentage {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        if snapshot.percentage.is_none() {
            return Ok(self.unknown.clone());
        }
        self.format.render(&snapshot.fields())
    }
}

/// Displays progress as "value of max"
///
/// Requires a known maximum: without one the render fails with a missing
/// `max_value` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleProgress {
    format: Template,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self::with_format(DEFAULT_SIMPLE_PROGRESS_FORMAT)
    }

    pub fn with_format(format: impl Into<Template>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for SimpleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedWidget for SimpleProgress {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        self.format.render(&snapshot.fields())
    }
}

/// Label field name, source field, and whether the source is seconds to format
const LABEL_FIELDS: [(&str, &str, bool); 7] = [
    ("elapsed", "total_seconds_elapsed", true),
    ("finished", "end_time", false),
    ("last_update", "last_update_time", false),
    ("max", "max_value", false),
    ("seconds", "seconds_elapsed", false),
    ("start", "start_time", false),
    ("value", "value", false),
];

/// Free-form label with short aliases for common fields
///
/// Besides the standard snapshot fields the template can use `elapsed`,
/// `finished`, `last_update`, `max`, `seconds`, `start` and `value`. An
/// alias whose source is unavailable (no maximum, not finished yet) renders
/// as an empty string; any other unknown field is still an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatLabel {
    format: Template,
}

impl FormatLabel {
    pub fn new(format: impl Into<Template>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl FixedWidget for FormatLabel {
    fn render(&self, snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        let mut fields = snapshot.fields();
        let mut omitted = Vec::new();

        for (name, source, as_time) in LABEL_FIELDS {
            let mapped = match fields.get(source) {
                Some(value) if as_time => value.as_f64().map(|s| FieldValue::from(format_time(s))),
                Some(value) => Some(value.clone()),
                None => None,
            };

            match mapped {
                Some(value) => {
                    fields.insert(name.to_string(), value);
                }
                None => {
                    trace!("FormatLabel: omitting '{name}', source '{source}' unavailable");
                    omitted.push(name);
                }
            }
        }

        self.format.render_lenient(&fields, &omitted)
    }
}
