//! Error types for gama-report
//!
//! Every failure surfaces during report construction (or table export); a
//! half-built report is never handed out.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a phase could not be found in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseBoundary {
    /// The phase-start event.
    Start,
    /// The phase-end event.
    End,
}

impl std::fmt::Display for PhaseBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// gama-report error types
#[derive(Error, Debug)]
pub enum Error {
    /// Neither or both of a log path and in-memory lines were supplied
    #[error("Invalid arguments: {0}")]
    Argument(String),

    /// The configuration line does not have the expected constructor-call shape
    #[error("Malformed configuration line: {0}")]
    Format(String),

    /// A required phase start or end event is absent from the log
    #[error("No {boundary} event found for phase '{phase}'")]
    PhaseNotFound {
        /// Phase name (e.g. "search")
        phase: String,
        /// Missing boundary
        boundary: PhaseBoundary,
    },

    /// Numeric, timestamp or arity conversion failure
    #[error("Log parse error: {0}")]
    Parse(String),

    /// Invalid log-format configuration
    #[error("Invalid log format: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Failure to decode a single serialized candidate.
///
/// Scoped to one candidate id; other candidates of the same report are
/// unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot decode candidate '{id}': {reason}")]
pub struct CandidateError {
    /// Candidate id the pipeline string belongs to (empty when decoded standalone)
    pub id: String,
    /// What went wrong
    pub reason: String,
}

impl CandidateError {
    /// Create a candidate error without an id attached yet.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            reason: reason.into(),
        }
    }

    /// Attach the candidate id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
