//! Structured error types for the inference engine
//!
//! Two failure classes exist: inputs that violate the documented constraints
//! (reported with every violated constraint, never just the first) and data
//! that is in-range but too sparse to test. Numerically degenerate situations
//! that are still statistically legitimate (a zero pooled standard error, a
//! zero expected contingency cell) are NOT errors; they resolve to tagged
//! fallback outcomes in [`crate::significance::TestOutcome`].

use serde::{Deserialize, Serialize};

/// Errors from planning or analysis operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// One or more inputs are out of range. Every violated constraint is
    /// listed so the caller sees the complete set of problems at once.
    #[error("invalid input: {}", .violations.join("; "))]
    InvalidInput { violations: Vec<String> },

    /// Each group needs at least one conversion for the tests to be
    /// meaningful; an all-zero table would only produce undefined statistics.
    #[error("need at least 1 conversion in each group for a meaningful test")]
    InsufficientData,
}

impl EngineError {
    pub fn invalid_input(violations: Vec<String>) -> Self {
        Self::InvalidInput { violations }
    }

    /// Machine-readable error code for client identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }

    /// The individual constraint violations, empty for non-validation errors
    pub fn violations(&self) -> &[String] {
        match self {
            Self::InvalidInput { violations } => violations,
            Self::InsufficientData => &[],
        }
    }

    /// Convert to a structured response suitable for serialization
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            violations: self.violations().to_vec(),
        }
    }
}

/// Structured error payload for external callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Individual constraint violations, when applicable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}

/// Type alias for Results using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
