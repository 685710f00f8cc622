//! Error taxonomy for the planners.

use thiserror::Error;

use crate::coverage::AgentId;

/// Failures surfaced by planning entry points.
///
/// `Topology` is recovered locally (a scan line or band is skipped) and only
/// escapes from the low-level helpers that report it. An empty strip is not an
/// error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("outside local frame domain: {0}")]
    Domain(String),

    #[error("polygon operation failed: {0}")]
    Topology(String),

    #[error("agent ids {assigned:?} do not cover 1..={expected} exactly once")]
    AssignmentMismatch { assigned: Vec<AgentId>, expected: usize },

    #[error("{what} has {got} entries, expected {expected}")]
    ParameterLengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParams(String),
}

impl PlanError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PlanError::InvalidParams(reason.into())
    }

    pub(crate) fn topology(reason: impl Into<String>) -> Self {
        PlanError::Topology(reason.into())
    }
}

/// Positive, finite spacing/length check shared by the planners.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), PlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanError::invalid(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}
