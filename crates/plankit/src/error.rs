//! Error types for plan log summarization.
//!
//! Most failure modes of the engine are not errors at all: a log without a
//! declaration line is simply left alone, and a count mismatch is reported as
//! a visible line in the synthesized output. The variants here cover the
//! cases where the engine has to give up before producing anything.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while summarizing a plan log.
#[derive(Debug, Error)]
pub enum Error {
    /// The readiness probe never succeeded within the retry budget
    #[error("log was not ready after {attempts} attempts ({}ms)", .waited.as_millis())]
    ReadinessTimeout {
        /// Number of times the probe was consulted
        attempts: u32,
        /// Total time spent sleeping between attempts
        waited: Duration,
    },

    /// A second declaration line was found while duplicates are rejected
    #[error("duplicate plan declaration on line {second} (first on line {first})")]
    DuplicateDeclaration {
        /// Display index of the first declaration line
        first: u64,
        /// Display index of the offending declaration line
        second: u64,
    },

    /// The log view failed to read or append lines
    #[error("log view error: {message}")]
    View {
        /// Description of what the view could not do
        message: String,
    },
}

impl Error {
    /// Whether the engine should give up quietly instead of reporting a failure.
    ///
    /// A timed-out readiness wait only means there was nothing to annotate yet.
    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::ReadinessTimeout { .. })
    }
}

/// Result type for plan log operations.
pub type Result<T> = std::result::Result<T, Error>;
