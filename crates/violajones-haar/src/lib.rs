//! violajones-haar - Haar features and weak classifiers
//!
//! This crate provides the feature side of a Viola-Jones detector:
//!
//! - **Haar features**: signed rectangle sums over a fixed window
//! - **Feature generation**: every placement of the five classic shapes
//! - **Weak classifiers**: single-feature decision stumps with training
//!
//! # Quick Start
//!
//! ```
//! use violajones_haar::{FeatureGenerator, FeatureKind, WeakClassifier};
//! use violajones_core::{Box, IntegralImage, Pix};
//!
//! // Bright left half, dark right half
//! let pix = Pix::from_gray_values(4, 2, &[200, 200, 10, 10, 200, 200, 10, 10]).unwrap();
//! let ii = IntegralImage::new(&pix).unwrap();
//!
//! let generator = FeatureGenerator::new(4, 2, FeatureKind::TwoHorizontal).unwrap();
//! let feature = generator.iter().last().unwrap();
//!
//! let sample = ii.vectorize_window(&Box::new(0, 0, 4, 2).unwrap()).unwrap();
//! let mut classifier = WeakClassifier::new(feature);
//! let fit = classifier.train(&[sample], &[]).unwrap();
//! assert_eq!(fit.errors, 0);
//! assert!(classifier.predict(&ii, (0, 0)).unwrap());
//! ```
//!
//! # Modules
//!
//! - [`feature`]: Haar feature evaluation
//! - [`kind`]: The five feature shapes
//! - [`generator`]: Exhaustive feature enumeration
//! - [`odometer`]: Bounded carrying counter used by the generator
//! - [`classifier`]: Decision stump training and prediction

pub mod classifier;
mod error;
pub mod feature;
pub mod generator;
pub mod kind;
pub mod odometer;

pub use error::{HaarError, HaarResult};

// Re-export commonly used types
pub use classifier::{Parity, StumpFit, WeakClassifier, fit_stump};
pub use feature::HaarFeature;
pub use generator::{
    FeatureGenerator, Features, GeneratorOptions, count_features, generate_all,
};
pub use kind::FeatureKind;
pub use odometer::{Odometer, next_limits};

// Re-export core for convenience
pub use violajones_core;
