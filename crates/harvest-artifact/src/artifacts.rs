//! Artifact sets returned by fixture gather operations
//!
//! Provides [`Artifacts`], a [`Namespace`] specialized with a result status
//! code. Every gather operation returns one.

use crate::namespace::{Namespace, NamespaceError};
use serde_json::Value;
use std::sync::Arc;

/// Namespace of gathered artifacts plus an overall status code
///
/// `result_code` follows process-exit conventions: `0` is success, any
/// nonzero value is an implementation-defined failure code. The producing
/// fixture may update the code until its gather call returns; callers treat
/// the set as read-only afterward.
///
/// Expected failures belong in the result code, not in an error: a fixture
/// that found nothing still *returns* its artifacts, letting orchestration
/// code invoke gather without a failure handler on the expected path.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    namespace: Namespace,
    result_code: i32,
}

impl Artifacts {
    /// Create new empty artifact set with the given status
    #[inline]
    #[must_use]
    pub fn new(result_code: i32) -> Self {
        Self {
            namespace: Namespace::new(),
            result_code,
        }
    }

    /// Create new artifact set chained onto a parent namespace
    ///
    /// Lookups that miss the gathered artifacts fall back to the parent
    /// (typically the invocation's input arguments) without copying them.
    #[inline]
    #[must_use]
    pub fn with_parent(result_code: i32, parent: Arc<Namespace>) -> Self {
        Self {
            namespace: Namespace::with_parent(parent),
            result_code,
        }
    }

    /// The overall status of the gather activity
    #[inline]
    #[must_use]
    pub fn result_code(&self) -> i32 {
        self.result_code
    }

    /// Update the overall status
    #[inline]
    pub fn set_result_code(&mut self, result_code: i32) {
        self.result_code = result_code;
    }

    /// Check for a zero (successful) status
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result_code == 0
    }

    /// Record a gathered artifact
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.namespace.insert(key, value);
    }

    /// Look up an artifact, falling back along the parent chain
    ///
    /// # Errors
    /// Returns [`NamespaceError::KeyNotFound`] when no binding exists
    /// anywhere in the chain.
    pub fn get(&self, key: &str) -> Result<&Value, NamespaceError> {
        self.namespace.get(key)
    }

    /// Check for an artifact along the chain without failing
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.namespace.contains(key)
    }

    /// Borrow the underlying namespace
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Mutably borrow the underlying namespace
    #[inline]
    pub fn namespace_mut(&mut self) -> &mut Namespace {
        &mut self.namespace
    }
}

impl From<Artifacts> for i32 {
    /// Convert to a process-style exit code
    fn from(artifacts: Artifacts) -> Self {
        artifacts.result_code
    }
}

impl From<&Artifacts> for i32 {
    fn from(artifacts: &Artifacts) -> Self {
        artifacts.result_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn artifacts_default_is_success() {
        let artifacts = Artifacts::default();
        assert_eq!(artifacts.result_code(), 0);
        assert!(artifacts.is_success());
    }

    #[test]
    fn artifacts_result_code_roundtrip() {
        let artifacts = Artifacts::new(0);
        assert_eq!(i32::from(artifacts), 0);

        let mut artifacts = Artifacts::new(-1);
        artifacts.set_result_code(7);
        assert_eq!(i32::from(artifacts), 7);
    }

    #[test]
    fn artifacts_nonzero_is_failure() {
        let artifacts = Artifacts::new(2);
        assert!(!artifacts.is_success());
        assert_eq!(i32::from(&artifacts), 2);
    }

    #[test]
    fn artifacts_store_and_lookup() {
        let mut artifacts = Artifacts::new(0);
        artifacts.insert("log_path", "/tmp/run.log");
        assert_eq!(
            artifacts.namespace().get_str("log_path").unwrap(),
            "/tmp/run.log"
        );
    }

    #[test]
    fn artifacts_fall_back_to_arguments() {
        let mut args = Namespace::new();
        args.insert("baud_rate", 115_200);

        let mut artifacts = Artifacts::with_parent(0, Arc::new(args));
        artifacts.insert("lines_read", 24);

        assert_eq!(artifacts.namespace().get_i64("lines_read").unwrap(), 24);
        assert_eq!(artifacts.namespace().get_i64("baud_rate").unwrap(), 115_200);
        assert!(artifacts.contains("baud_rate"));
    }

    #[test]
    fn artifacts_shadow_arguments() {
        let mut args = Namespace::new();
        args.insert("target", "from-args");

        let mut artifacts = Artifacts::with_parent(0, Arc::new(args));
        artifacts.insert("target", "from-gather");

        assert_eq!(artifacts.namespace().get_str("target").unwrap(), "from-gather");
    }
}
