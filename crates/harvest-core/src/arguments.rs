//! Argument description collaborator contract
//!
//! Fixtures declare their accepted parameters to an external collector that
//! knows how to turn them into command-line flags or test-runner
//! parameters. The core only defines the contract and guarantees each type
//! is visited at most once; interpreting the declarations is the
//! collector's business.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collector of fixture argument declarations
///
/// Implementations bridge to a concrete argument system (a CLI parser, a
/// test-runner's parameter mechanism). Portable by design: a fixture's
/// declarations drive both environments.
#[cfg_attr(test, mockall::automock)]
pub trait Arguments {
    /// Describe one accepted argument
    fn add_argument(&mut self, argument: ArgumentSpec);

    /// Provide a fallback value for a named argument
    fn set_default(&mut self, key: &str, value: Value);
}

/// Portable description of one fixture argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    name: String,
    default: Option<Value>,
    help: Option<String>,
}

impl ArgumentSpec {
    /// Create new argument description
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            help: None,
        }
    }

    /// Attach a default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach help text
    #[inline]
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// The argument name, as the collector should expose it
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default, if any
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The help text, if any
    #[inline]
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}
