//! violajones-test - Regression test framework for the violajones workspace
//!
//! Supports two modes:
//!
//! - **Compare**: Compare results and record failures (default)
//! - **Display**: Report every comparison without failing
//!
//! # Usage
//!
//! ```ignore
//! use violajones_test::RegParams;
//!
//! let mut rp = RegParams::new("generator");
//! rp.compare_values(690000.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
