//! Chained key/value namespaces for fixture arguments and artifacts
//!
//! Provides [`Namespace`], a two-level lookup structure: a local binding map
//! plus an optional parent reference. Lookups walk local-then-parent; writes
//! are always local.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Scoped key/value store with parent-chain fallback
///
/// A `Namespace` resolves a key against its local bindings first and only
/// then delegates to its parent chain. Local bindings shadow ancestors.
/// The chain topology is fixed at construction; local entries may still be
/// added afterward.
///
/// # Examples
/// ```
/// use harvest_artifact::Namespace;
/// use std::sync::Arc;
///
/// let mut base = Namespace::new();
/// base.insert("host", "localhost");
///
/// let mut child = Namespace::with_parent(Arc::new(base));
/// child.insert("port", 8080);
///
/// assert_eq!(*child.get("host").unwrap(), "localhost");
/// assert_eq!(*child.get("port").unwrap(), 8080);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    bindings: HashMap<String, Value>,
    parent: Option<Arc<Namespace>>,
}

impl Namespace {
    /// Create new namespace with no parent
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new namespace chained onto a parent
    #[inline]
    #[must_use]
    pub fn with_parent(parent: Arc<Namespace>) -> Self {
        Self {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Get the parent namespace, if any
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Namespace>> {
        self.parent.as_ref()
    }

    /// Bind a key locally
    ///
    /// Always writes to this namespace; ancestors are never mutated. An
    /// existing local binding for the same key is replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(key.into(), value.into());
    }

    /// Look up a key along the local-then-parent chain
    ///
    /// # Errors
    /// Returns [`NamespaceError::KeyNotFound`] when no binding exists
    /// anywhere in the chain.
    pub fn get(&self, key: &str) -> Result<&Value, NamespaceError> {
        if let Some(value) = self.bindings.get(key) {
            return Ok(value);
        }
        match &self.parent {
            Some(parent) => parent.get(key),
            None => Err(NamespaceError::KeyNotFound(key.to_string())),
        }
    }

    /// Check for a binding along the chain without failing
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        if self.bindings.contains_key(key) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.contains(key),
            None => false,
        }
    }

    /// Get a string value
    ///
    /// # Errors
    /// Returns [`NamespaceError::KeyNotFound`] on a chain-wide miss or
    /// [`NamespaceError::WrongType`] when the binding is not a string.
    pub fn get_str(&self, key: &str) -> Result<&str, NamespaceError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| NamespaceError::wrong_type(key, "string"))
    }

    /// Get an integer value
    ///
    /// # Errors
    /// Returns [`NamespaceError::KeyNotFound`] on a chain-wide miss or
    /// [`NamespaceError::WrongType`] when the binding is not an integer.
    pub fn get_i64(&self, key: &str) -> Result<i64, NamespaceError> {
        self.get(key)?
            .as_i64()
            .ok_or_else(|| NamespaceError::wrong_type(key, "integer"))
    }

    /// Get a float value
    ///
    /// # Errors
    /// Returns [`NamespaceError::KeyNotFound`] on a chain-wide miss or
    /// [`NamespaceError::WrongType`] when the binding is not a number.
    pub fn get_f64(&self, key: &str) -> Result<f64, NamespaceError> {
        self.get(key)?
            .as_f64()
            .ok_or_else(|| NamespaceError::wrong_type(key, "number"))
    }

    /// Get a boolean value
    ///
    /// # Errors
    /// Returns [`NamespaceError::KeyNotFound`] on a chain-wide miss or
    /// [`NamespaceError::WrongType`] when the binding is not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, NamespaceError> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| NamespaceError::wrong_type(key, "boolean"))
    }

    /// Number of local bindings (ancestors excluded)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if there are no local bindings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over local bindings (ancestors excluded)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
            parent: None,
        }
    }
}

/// Errors related to namespace lookups
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    /// No binding anywhere in the chain
    #[error("key not found in namespace chain: {0}")]
    KeyNotFound(String),

    /// Binding exists but holds a different value type
    #[error("key '{key}' is not a {expected}")]
    WrongType {
        /// The key that was looked up
        key: String,
        /// The value type the caller asked for
        expected: &'static str,
    },
}

impl NamespaceError {
    fn wrong_type(key: &str, expected: &'static str) -> Self {
        Self::WrongType {
            key: key.to_string(),
            expected,
        }
    }
}
