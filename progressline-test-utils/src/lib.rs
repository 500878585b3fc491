//! Test utilities for progressline
//!
//! This crate provides snapshot builders, a manually driven clock and an
//! inspectable output sink for testing bars and widgets.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{SnapshotBuilder, fixed_start};
pub use mocks::{ManualClock, SharedBuffer};
