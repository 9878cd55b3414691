//! Error types for the fixture core
//!
//! Covers the taxonomy shared by fixtures and the manager:
//! - Fixture lookup failures
//! - Observation timeouts and gate violations
//! - Re-entrant construction
//! - Namespace lookup misses surfaced through gather

use crate::observe::ObserveError;
use harvest_artifact::NamespaceError;

/// Main fixture error type
///
/// Expected gather failures are *not* errors: they are encoded in the
/// returned [`Artifacts`](harvest_artifact::Artifacts) result code. Errors
/// here signal infrastructure faults or programming mistakes and are fatal
/// to the caller's flow.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// No registered fixture type matches the requested canonical name
    #[error("no fixture registered with canonical name '{0}'")]
    NotFound(String),

    /// A fixture requested itself during its own construction
    #[error("fixture '{0}' was requested re-entrantly during its own construction")]
    ConstructionCycle(String),

    /// Task observation failed
    #[error("task observation failed: {0}")]
    Observe(#[from] ObserveError),

    /// A companion completed although the observer had to be the sole gate
    ///
    /// Signals a fixture or test logic error rather than an infrastructure
    /// fault.
    #[error("{completed} tasks under observation completed before the observation was complete")]
    GateViolation {
        /// Total completed tasks, observer included
        completed: usize,
    },

    /// Namespace lookup miss surfaced from gather
    #[error("namespace error: {0}")]
    Namespace(#[from] NamespaceError),

    /// Truly unexpected condition inside a concrete fixture
    #[error("fixture internal failure: {0}")]
    Internal(String),
}

impl FixtureError {
    /// Check whether this error is the observation-timeout case
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Observe(ObserveError::Timeout { .. }))
    }

    /// Check whether this error signals a gate violation
    #[inline]
    #[must_use]
    pub fn is_gate_violation(&self) -> bool {
        matches!(self, Self::GateViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fixture_error_display() {
        let err = FixtureError::NotFound("serial_monitor".to_string());
        assert!(err.to_string().contains("serial_monitor"));
    }

    #[test]
    fn fixture_error_is_timeout() {
        let err = FixtureError::from(ObserveError::Timeout {
            timeout: Duration::from_secs(5),
        });
        assert!(err.is_timeout());
        assert!(!err.is_gate_violation());
    }

    #[test]
    fn fixture_error_is_gate_violation() {
        let err = FixtureError::GateViolation { completed: 2 };
        assert!(err.is_gate_violation());
        assert!(!err.is_timeout());
    }

    #[test]
    fn namespace_error_converts() {
        let err: FixtureError = NamespaceError::KeyNotFound("port".to_string()).into();
        assert!(matches!(err, FixtureError::Namespace(_)));
    }
}
