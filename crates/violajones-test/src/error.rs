//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building regression fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// A fixture image could not be built
    #[error("failed to build fixture '{name}': {source}")]
    Fixture {
        name: &'static str,
        #[source]
        source: violajones_core::Error,
    },

    /// Fixture parameters make no sense
    #[error("invalid fixture parameter: {0}")]
    InvalidFixture(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
