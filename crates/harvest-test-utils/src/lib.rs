//! Testing utilities for the Harvest workspace
//!
//! Shared canned fixtures, a recording argument collector, and a tracing
//! initializer for tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use harvest_artifact::{Artifacts, Namespace};
use harvest_core::{
    ArgumentSpec, Arguments, Fixture, FixtureCore, FixtureError, FixtureFactory, FixtureManager,
    FixtureRegistry,
};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

static TRACING: OnceCell<()> = OnceCell::new();

/// Install a test-friendly tracing subscriber, once per process
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Fixture that copies its `message` argument into the gathered artifacts
///
/// Missing `message` is an expected failure: it is reported through the
/// result code, not an error.
pub struct EchoFixture {
    core: FixtureCore,
}

#[async_trait]
impl Fixture for EchoFixture {
    fn core(&self) -> &FixtureCore {
        &self.core
    }

    async fn gather(&self, args: &Namespace) -> Result<Artifacts, FixtureError> {
        let mut artifacts = Artifacts::new(-1);
        match args.get_str("message") {
            Ok(message) => {
                artifacts.insert("message", message);
                artifacts.set_result_code(0);
            }
            Err(_) => artifacts.set_result_code(2),
        }
        Ok(artifacts)
    }
}

impl FixtureFactory for EchoFixture {
    fn fixture_name() -> Cow<'static, str> {
        Cow::Borrowed("echo")
    }

    fn create(manager: &Arc<FixtureManager>) -> Self {
        Self {
            core: FixtureCore::new(Self::fixture_name(), manager),
        }
    }

    fn visit_test_arguments(arguments: &mut dyn Arguments) {
        arguments.add_argument(ArgumentSpec::new("--message").with_help("text to echo back"));
    }
}

/// Fixture that sleeps for `delay-seconds` before reporting success
pub struct SleepFixture {
    core: FixtureCore,
}

#[async_trait]
impl Fixture for SleepFixture {
    fn core(&self) -> &FixtureCore {
        &self.core
    }

    async fn gather(&self, args: &Namespace) -> Result<Artifacts, FixtureError> {
        let delay = args.get_f64("delay-seconds").unwrap_or(1.0);
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;

        let mut artifacts = Artifacts::new(0);
        artifacts.insert("slept_seconds", delay);
        Ok(artifacts)
    }
}

impl FixtureFactory for SleepFixture {
    fn fixture_name() -> Cow<'static, str> {
        Cow::Borrowed("sleeper")
    }

    fn create(manager: &Arc<FixtureManager>) -> Self {
        Self {
            core: FixtureCore::new(Self::fixture_name(), manager),
        }
    }

    fn visit_test_arguments(arguments: &mut dyn Arguments) {
        arguments.add_argument(ArgumentSpec::new("--delay-seconds").with_default(1.0));
    }
}

/// Fixture whose gather always reports an expected failure
pub struct FailingFixture {
    core: FixtureCore,
}

#[async_trait]
impl Fixture for FailingFixture {
    fn core(&self) -> &FixtureCore {
        &self.core
    }

    async fn gather(&self, _args: &Namespace) -> Result<Artifacts, FixtureError> {
        let mut artifacts = Artifacts::new(1);
        artifacts.insert("reason", "nothing to gather");
        Ok(artifacts)
    }
}

impl FixtureFactory for FailingFixture {
    fn fixture_name() -> Cow<'static, str> {
        Cow::Borrowed("always_fails")
    }

    fn create(manager: &Arc<FixtureManager>) -> Self {
        Self {
            core: FixtureCore::new(Self::fixture_name(), manager),
        }
    }
}

/// Argument collector that records everything declared to it
#[derive(Debug, Default)]
pub struct RecordingArguments {
    pub added: Vec<ArgumentSpec>,
    pub defaults: Vec<(String, Value)>,
}

impl Arguments for RecordingArguments {
    fn add_argument(&mut self, argument: ArgumentSpec) {
        self.added.push(argument);
    }

    fn set_default(&mut self, key: &str, value: Value) {
        self.defaults.push((key.to_string(), value));
    }
}

impl RecordingArguments {
    /// Names of every declared argument, in declaration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.added.iter().map(ArgumentSpec::name).collect()
    }
}

/// Registry pre-loaded with every canned fixture
#[must_use]
pub fn test_registry() -> FixtureRegistry {
    let mut registry = FixtureRegistry::new();
    registry.register_factory::<EchoFixture>();
    registry.register_factory::<SleepFixture>();
    registry.register_factory::<FailingFixture>();
    registry
}

/// Manager over [`test_registry`]
#[must_use]
pub fn test_manager() -> Arc<FixtureManager> {
    FixtureManager::new(test_registry())
}
