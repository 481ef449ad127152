//! Error types for violajones-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Construction errors and bounds errors are distinct variants so callers
//! can tell a bad input image apart from a bad query.

use thiserror::Error;

/// violajones-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Unsupported pixel depth for this operation
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),

    /// Pixel coordinate outside the image
    #[error("pixel ({x}, {y}) outside {width}x{height} image")]
    PixelOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// Rectangle not fully inside the queried area
    #[error("rectangle ({x}, {y}, {w}, {h}) outside {width}x{height} area")]
    RectOutOfBounds {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        width: u32,
        height: u32,
    },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
