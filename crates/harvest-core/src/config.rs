//! File-sourced argument defaults
//!
//! Provides [`ArgumentDefaults`], a flat lookup table parsed from a TOML
//! document. Nested tables flatten into `section.key` paths. Converting the
//! table into a base [`Namespace`] lets invocation arguments chain onto
//! file defaults without copying either side.

use harvest_artifact::Namespace;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Defaults for fixture arguments, loaded from configuration
///
/// # Examples
/// ```
/// use harvest_core::ArgumentDefaults;
///
/// let defaults: ArgumentDefaults = r#"
///     [serial]
///     port = "/dev/ttyUSB0"
///     baud = 115200
/// "#
/// .parse()
/// .unwrap();
///
/// assert_eq!(*defaults.get("serial.port").unwrap(), "/dev/ttyUSB0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgumentDefaults {
    values: HashMap<String, Value>,
}

impl ArgumentDefaults {
    /// Load defaults from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file cannot be read, or
    /// [`ConfigError::Parse`] when its contents are not valid TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Look up a default by flattened key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check for a default by flattened key
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of loaded defaults
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no defaults were loaded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert into a base namespace for argument chaining
    ///
    /// The returned namespace is meant to sit at the root of an invocation's
    /// chain: arguments constructed with it as parent fall back to file
    /// defaults on lookup misses.
    #[must_use]
    pub fn into_namespace(self) -> Namespace {
        self.values.into_iter().collect()
    }
}

impl FromStr for ArgumentDefaults {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let table: toml::Table = text
            .parse()
            .map_err(|err: toml::de::Error| ConfigError::Parse(err.to_string()))?;

        let mut values = HashMap::new();
        flatten("", &toml::Value::Table(table), &mut values)?;
        Ok(Self { values })
    }
}

/// Flatten nested tables into dotted key paths
fn flatten(
    prefix: &str,
    value: &toml::Value,
    out: &mut HashMap<String, Value>,
) -> Result<(), ConfigError> {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out)?;
            }
        }
        leaf => {
            let json = serde_json::to_value(leaf)
                .map_err(|err| ConfigError::Parse(err.to_string()))?;
            out.insert(prefix.to_string(), json);
        }
    }
    Ok(())
}

/// Errors related to defaults loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Defaults file could not be read
    #[error("failed to read defaults file: {0}")]
    Io(#[from] std::io::Error),

    /// Defaults file is not valid TOML
    #[error("failed to parse defaults: {0}")]
    Parse(String),
}
