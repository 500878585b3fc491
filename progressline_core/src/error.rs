//! Error types for the progressline core library
//!
//! Errors are grouped by category so callers can decide whether a failure
//! should abort a render pass or merely be reported.

use thiserror::Error;

pub mod format;
pub mod validation;

pub use self::format::FormatError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the progressline core library
///
/// Errors are categorized into three main types:
/// - Format errors: template field/type problems raised while rendering
/// - Validation errors: bad widget configuration or out-of-range values
/// - I/O errors: failures writing a rendered line to its sink
#[derive(Error, Debug)]
pub enum Error {
    /// Template rendering errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Configuration and range validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Output sink errors
    #[error("Failed to write progress line: {0}")]
    Io(#[from] std::io::Error),
}
