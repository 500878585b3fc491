//! Progress bar driver
//!
//! [`ProgressBar`] owns the per-bar state (value, timestamps, update count
//! and [`ExtraData`]), builds a [`ProgressSnapshot`] on every change and
//! writes the laid-out line to its sink, prefixed with a carriage return so
//! each render overwrites the previous one.

use crate::error::ValidationError;
use crate::layout;
use crate::widgets::{AnimatedMarker, Bar, Counter, Eta, Percentage, Timer, Widget};
use crate::{BarState, ExtraData, ProgressSnapshot, Result};
use chrono::{DateTime, Local};
use log::debug;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

pub const DEFAULT_WIDTH: usize = 80;

/// Source of timestamps for a bar
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Widgets used when none are configured
///
/// Bars with a known maximum show percentage, bar and ETA; bars without one
/// show a spinner, the current count and the elapsed time.
pub fn default_widgets(has_max: bool) -> Vec<Widget> {
    if has_max {
        vec![
            Percentage::new().into(),
            " ".into(),
            Bar::new().into(),
            " ".into(),
            Eta::new().into(),
        ]
    } else {
        vec![
            AnimatedMarker::new().into(),
            " ".into(),
            Counter::new().into(),
            " ".into(),
            Timer::new().into(),
        ]
    }
}

/// Configures a [`ProgressBar`]
#[derive(Debug, Clone)]
pub struct ProgressBarBuilder {
    min_value: f64,
    max_value: Option<f64>,
    widgets: Option<Vec<Widget>>,
    width: usize,
    clock: Arc<dyn Clock>,
}

impl ProgressBarBuilder {
    pub fn new() -> Self {
        Self {
            min_value: 0.0,
            max_value: None,
            widgets: None,
            width: DEFAULT_WIDTH,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn min_value(mut self, min_value: f64) -> Self {
        self.min_value = min_value;
        self
    }

    /// Known end of the range; leave unset for open-ended progress
    pub fn max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn unknown_max(mut self) -> Self {
        self.max_value = None;
        self
    }

    pub fn widgets(mut self, widgets: Vec<Widget>) -> Self {
        self.widgets = Some(widgets);
        self
    }

    /// Append one widget to the configured list
    pub fn widget(mut self, widget: impl Into<Widget>) -> Self {
        self.widgets.get_or_insert_with(Vec::new).push(widget.into());
        self
    }

    /// Total line width in characters
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a bar writing to `sink`
    pub fn build<W: Write>(self, sink: W) -> Result<ProgressBar<W>> {
        if !self.min_value.is_finite() {
            return Err(ValidationError::invalid_configuration("min_value must be finite").into());
        }
        if let Some(max) = self.max_value
            && !(max.is_finite() && max >= self.min_value)
        {
            return Err(ValidationError::invalid_range(self.min_value, max).into());
        }

        let widgets = self
            .widgets
            .unwrap_or_else(|| default_widgets(self.max_value.is_some()));

        Ok(ProgressBar {
            widgets,
            min_value: self.min_value,
            max_value: self.max_value,
            width: self.width,
            clock: self.clock,
            sink,
            extra: ExtraData::new(),
            state: BarState::NotStarted,
            value: self.min_value,
            previous_value: None,
            start_time: None,
            last_update_time: None,
            end_time: None,
            updates: 0,
        })
    }
}

impl Default for ProgressBarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-line progress bar
pub struct ProgressBar<W: Write> {
    widgets: Vec<Widget>,
    min_value: f64,
    max_value: Option<f64>,
    width: usize,
    clock: Arc<dyn Clock>,
    sink: W,
    extra: ExtraData,
    state: BarState,
    value: f64,
    previous_value: Option<f64>,
    start_time: Option<DateTime<Local>>,
    last_update_time: Option<DateTime<Local>>,
    end_time: Option<DateTime<Local>>,
    updates: u64,
}

impl<W: Write> fmt::Debug for ProgressBar<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressBar")
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("width", &self.width)
            .field("state", &self.state)
            .field("value", &self.value)
            .field("updates", &self.updates)
            .finish_non_exhaustive()
    }
}

impl ProgressBar<std::io::Stderr> {
    /// Bar over `0..=max_value` with the default widgets, drawn on stderr
    pub fn new(max_value: f64) -> Result<Self> {
        ProgressBarBuilder::new()
            .max_value(max_value)
            .build(std::io::stderr())
    }
}

impl<W: Write> ProgressBar<W> {
    pub fn builder() -> ProgressBarBuilder {
        ProgressBarBuilder::new()
    }

    /// Reset all counters and begin a new run
    pub fn start(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.extra.clear();
        self.value = self.min_value;
        self.previous_value = None;
        self.updates = 0;
        self.start_time = Some(now);
        self.last_update_time = Some(now);
        self.end_time = None;
        self.state = BarState::Running;

        debug!(
            "Starting progress bar: min {}, max {:?}, width {}",
            self.min_value, self.max_value, self.width
        );
        self.render()
    }

    /// Move to `value` and redraw
    ///
    /// Starts the bar first if needed. Values outside `min..=max` (or NaN)
    /// are rejected without touching the bar.
    pub fn update(&mut self, value: f64) -> Result<()> {
        if self.state == BarState::Finished {
            return Err(ValidationError::AlreadyFinished.into());
        }
        self.check_range(value)?;
        if self.state == BarState::NotStarted {
            self.start()?;
        }

        self.previous_value = Some(self.value);
        self.value = value;
        self.updates += 1;
        self.last_update_time = Some(self.clock.now());
        self.render()
    }

    /// Complete the bar: jump to the maximum, draw a final line and end it
    /// with a newline
    ///
    /// Finishing an already finished bar does nothing.
    pub fn finish(&mut self) -> Result<()> {
        if self.state == BarState::Finished {
            return Ok(());
        }
        if self.state == BarState::NotStarted {
            self.start()?;
        }

        let now = self.clock.now();
        if let Some(max) = self.max_value {
            self.previous_value = Some(self.value);
            self.value = max;
        }
        self.last_update_time = Some(now);
        self.end_time = Some(now);
        self.state = BarState::Finished;

        self.render()?;
        writeln!(self.sink)?;
        self.sink.flush()?;
        debug!("Finished progress bar after {} updates", self.updates);
        Ok(())
    }

    /// Current progress state as seen by widgets
    pub fn snapshot(&self) -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::new(self.value, self.min_value, self.max_value)
            .with_updates(self.updates);
        if let Some(previous) = self.previous_value {
            snapshot = snapshot.with_previous_value(previous);
        }
        if let (Some(start), Some(last_update)) = (self.start_time, self.last_update_time) {
            snapshot = snapshot.with_times(start, last_update);
        }
        if let Some(end) = self.end_time {
            snapshot = snapshot.with_end_time(end);
        }
        snapshot
    }

    /// Lay out the widgets for the current state without writing anything
    pub fn render_line(&mut self) -> Result<String> {
        let snapshot = self.snapshot();
        layout::render_line(&self.widgets, self.width, &snapshot, &mut self.extra)
    }

    fn render(&mut self) -> Result<()> {
        let line = self.render_line()?;
        write!(self.sink, "\r{line}")?;
        self.sink.flush()?;
        Ok(())
    }

    fn check_range(&self, value: f64) -> Result<()> {
        let below = value.is_nan() || value < self.min_value;
        let above = self.max_value.is_some_and(|max| value > max);
        if below || above {
            return Err(ValidationError::out_of_range(value, self.min_value, self.max_value).into());
        }
        Ok(())
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn state(&self) -> BarState {
        self.state
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn extra(&self) -> &ExtraData {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut ExtraData {
        &mut self.extra
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}
