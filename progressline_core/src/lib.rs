//! Progressline Core Library
//!
//! Single-line text progress bars built from composable widgets: fixed
//! widgets (counters, timers, ETA, transfer speed, labels) and elastic
//! widgets (bars) that share whatever width is left on the line.

pub mod error;
pub mod extra;
pub mod format;
pub mod layout;
pub mod progress;
pub mod samples;
pub mod snapshot;
pub mod utils;
pub mod widgets;

// Re-export main types
pub use error::{Error, Result};
pub use extra::{ExtraData, ExtraValue};
pub use format::{FieldValue, Fields, Template};
pub use layout::render_line;
pub use progress::{
    Clock, DEFAULT_WIDTH, ProgressBar, ProgressBarBuilder, SystemClock, default_widgets,
};
pub use samples::{DEFAULT_SAMPLES, Sample, SampleBuffer, SampleDelta};
pub use snapshot::{BarState, Elapsed, ProgressSnapshot};
pub use widgets::{ElasticWidget, FixedWidget, Widget};
