//! Error types for violajones-haar

use thiserror::Error;
use violajones_core::Box;

/// Errors that can occur while building, evaluating or training features
#[derive(Debug, Error)]
pub enum HaarError {
    /// Core library error (bounds, dimensions)
    #[error("core error: {0}")]
    Core(#[from] violajones_core::Error),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A feature rectangle does not lie inside the feature window
    #[error("rectangle {rect:?} outside {width}x{height} window")]
    RectOutsideWindow { rect: Box, width: u32, height: u32 },

    /// A sample's extent differs from the feature window
    #[error("window mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    WindowMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type for Haar feature operations
pub type HaarResult<T> = Result<T, HaarError>;
