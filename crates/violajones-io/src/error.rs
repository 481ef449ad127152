//! I/O error types
//!
//! Every codec maps its failures into [`IoError`], so callers loading
//! training images handle a single error type.

use thiserror::Error;
use violajones_core::ImageFormat;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not recognized or not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The format was recognized but its codec feature is disabled
    #[error("{0:?} support not enabled")]
    FormatDisabled(ImageFormat),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. zero image dimensions)
    #[error("core error: {0}")]
    Core(#[from] violajones_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
