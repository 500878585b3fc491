//! Test data builders

mod snapshot;

pub use snapshot::{SnapshotBuilder, fixed_start};
