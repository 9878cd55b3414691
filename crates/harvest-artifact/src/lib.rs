//! Harvest Artifact System
//!
//! Chained namespaces and the artifact sets that gather operations return.
//!
//! # Core Concepts
//!
//! - [`Namespace`]: scoped key/value lookup with parent-chain fallback
//! - [`Artifacts`]: a `Namespace` tagged with a gather result code
//!
//! # Example
//!
//! ```rust
//! use harvest_artifact::{Artifacts, Namespace};
//! use std::sync::Arc;
//!
//! let mut args = Namespace::new();
//! args.insert("device", "/dev/ttyUSB0");
//!
//! let mut artifacts = Artifacts::with_parent(0, Arc::new(args));
//! artifacts.insert("firmware_rev", "1.4.2");
//!
//! // Gathered values shadow arguments; misses fall back to them.
//! assert_eq!(artifacts.namespace().get_str("device").unwrap(), "/dev/ttyUSB0");
//! assert!(artifacts.is_success());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod artifacts;
mod namespace;

// Re-exports
pub use artifacts::Artifacts;
pub use namespace::{Namespace, NamespaceError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn gather_result_over_argument_chain() {
        // Defaults -> invocation args -> gathered artifacts, one chain.
        let mut defaults = Namespace::new();
        defaults.insert("retries", 3);
        defaults.insert("device", "/dev/null");

        let mut args = Namespace::with_parent(Arc::new(defaults));
        args.insert("device", "/dev/ttyACM1");

        let mut artifacts = Artifacts::with_parent(0, Arc::new(args));
        artifacts.insert("bytes_captured", 4096);

        let ns = artifacts.namespace();
        assert_eq!(ns.get_i64("bytes_captured").unwrap(), 4096);
        assert_eq!(ns.get_str("device").unwrap(), "/dev/ttyACM1");
        assert_eq!(ns.get_i64("retries").unwrap(), 3);
    }
}
