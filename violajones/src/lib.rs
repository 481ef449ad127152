//! Viola-Jones - feature engineering for rectangle-feature detectors
//!
//! Computes summed-area tables over images, enumerates Haar-like
//! features for a fixed window, and trains single-feature decision
//! stumps on labeled windows.
//!
//! # Overview
//!
//! - Image I/O (BMP, PNM, PNG) into a packed pixel buffer
//! - Integral images with O(1) rectangle sums and window sampling
//! - The five classic Haar feature shapes and their exhaustive generator
//! - Weak classifier training and prediction
//!
//! # Example
//!
//! ```
//! use violajones::{IntegralImage, Pix};
//! use violajones::haar::{FeatureGenerator, FeatureKind};
//!
//! let pix = Pix::from_gray_values(2, 2, &[1, 2, 3, 4]).unwrap();
//! let ii = IntegralImage::new(&pix).unwrap();
//! assert_eq!(ii.total(), 10);
//!
//! let generator = FeatureGenerator::new(24, 24, FeatureKind::TwoHorizontal).unwrap();
//! assert_eq!(generator.len(), 690000);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use violajones_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use violajones_haar as haar;
pub use violajones_io as io;
