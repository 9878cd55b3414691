//! Harvest Core - fixture lifecycle and concurrency machinery
//!
//! The machinery that makes fixtures safe to share and compose:
//! - A task-observation protocol where one task gates a group of
//!   concurrently running tasks, with timeout and ordering guarantees
//! - A per-scope manager that discovers fixture types through a capability
//!   registry and guarantees one live instance per canonical name
//! - The argument-visitor and defaults layers that feed fixture invocations
//!
//! # Example
//!
//! ```rust,ignore
//! use harvest_core::{FixtureManager, FixtureRegistry};
//! use harvest_artifact::Namespace;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = FixtureRegistry::new();
//! registry.register_factory::<SerialMonitor>();
//!
//! let manager = FixtureManager::new(registry);
//! let monitor = manager.get_fixture("serial_monitor")?;
//!
//! let mut args = Namespace::new();
//! args.insert("port", "/dev/ttyUSB0");
//!
//! let artifacts = monitor.gather(&args).await?;
//! std::process::exit(i32::from(artifacts));
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod arguments;
pub mod config;
pub mod error;
pub mod fixture;
pub mod manager;
pub mod observe;
pub mod registry;

// Re-exports for convenience
pub use arguments::{ArgumentSpec, Arguments};
pub use config::{ArgumentDefaults, ConfigError};
pub use error::FixtureError;
pub use fixture::{Fixture, FixtureCore, FixtureFactory};
pub use manager::FixtureManager;
pub use observe::{Completed, Observation, ObserveError, TaskFuture};
pub use registry::{FixtureRegistry, FixtureType};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Harvest fixtures
    pub use crate::{
        ArgumentSpec, Arguments, Fixture, FixtureCore, FixtureError, FixtureFactory,
        FixtureManager, FixtureRegistry, FixtureType,
    };
    pub use harvest_artifact::{Artifacts, Namespace};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
