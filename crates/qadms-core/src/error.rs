//! Error types for QADMS core lookups.
//!
//! Normalization and rule evaluation never fail: structural problems land in
//! a [`crate::ValidationReport`] and content problems become violations.
//! These errors only cover parsing identifiers supplied by callers.

/// Errors raised when resolving caller-supplied identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Not one of color, spacing, typography, radius, shadow.
    #[error("unknown token group: {0}")]
    UnknownGroup(String),

    /// No registered rule carries this id.
    #[error("unknown rule id: {0}")]
    UnknownRule(String),

    /// Severity names are low, medium, high, critical.
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
}
