//! Grader Error Types
//!
//! [`GraderError`] covers the conditions that genuinely stop the pipeline: unreadable or
//! malformed input files, a missing session, and invalid configuration. Wrong answers and
//! degenerate sessions (no attempts, a single attempt, zero variance) are **not** errors; they
//! surface as ordinary values in the verification outcome and analysis results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraderError {
    /// Configuration rejected at construction time (weights, thresholds, task counts).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File missing, unreadable, or too large.
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON is malformed or does not match the expected schema.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The attempt store has no record of the requested session.
    #[error("Unknown session: {0}")]
    MissingSession(String),

    /// An attempt record violates the attempt log invariants.
    #[error("Malformed attempt: {0}")]
    MalformedAttempt(String),
}

/// Error half of the execution-engine contract: the artifact could not be executed.
///
/// The message is shown to the learner verbatim, so engines should keep it readable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExecutionFailure(pub String);

impl ExecutionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
