//! Fixture abstraction
//!
//! A fixture encapsulates one source of test/operational data and exposes it
//! uniformly to direct callers and orchestration code. Every fixture carries
//! a [`FixtureCore`]: its canonical name, a back-reference to the owning
//! manager, its logging span, and the task-observation helpers.

use crate::arguments::Arguments;
use crate::error::FixtureError;
use crate::manager::FixtureManager;
use crate::observe;
use async_trait::async_trait;
use harvest_artifact::{Artifacts, Namespace};
use std::borrow::Cow;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Common contract for all fixtures
///
/// `gather` must perform fresh work on every call; caching, if desired, is
/// the caller's or manager's responsibility. Expected failure conditions are
/// encoded in the returned [`Artifacts`] result code; `Err` is reserved for
/// programming errors and truly exceptional conditions.
#[async_trait]
pub trait Fixture: Send + Sync {
    /// Identity and helper state shared by every fixture
    fn core(&self) -> &FixtureCore;

    /// The canonical name for this fixture instance
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Gather fresh artifacts from this fixture's data source
    ///
    /// # Errors
    /// Only for programming errors or truly exceptional conditions; expected
    /// failures are reported through [`Artifacts::result_code`].
    async fn gather(&self, args: &Namespace) -> Result<Artifacts, FixtureError>;
}

/// Type-level fixture declaration consumed by the capability registry
///
/// Implemented by concrete fixture types so a
/// [`FixtureType`](crate::registry::FixtureType) handle can be derived from
/// them via [`FixtureType::of`](crate::registry::FixtureType::of).
pub trait FixtureFactory: Fixture + Sized + 'static {
    /// Stable identifier for this fixture type
    ///
    /// Deterministic and stable for a given concrete type. Defaults to the
    /// fully-qualified type path; override to pin a short name that survives
    /// refactors.
    #[must_use]
    fn fixture_name() -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Construct an instance bound to the owning manager
    fn create(manager: &Arc<FixtureManager>) -> Self;

    /// Declare accepted parameters to the external argument collector
    ///
    /// The manager guarantees this is invoked at most once per type, before
    /// the type's first use. The core never interprets the results.
    fn visit_test_arguments(_arguments: &mut dyn Arguments) {}
}

/// Identity, logging, and observation helpers shared by every fixture
///
/// Holds the canonical name, a weak reference to the owning manager (shared,
/// not owned; the manager outlives its fixtures' usage), and the fixture's
/// tracing span.
#[derive(Debug, Clone)]
pub struct FixtureCore {
    name: String,
    manager: Weak<FixtureManager>,
    span: tracing::Span,
}

impl FixtureCore {
    /// Create core state bound to an owning manager
    #[must_use]
    pub fn new(name: impl Into<String>, manager: &Arc<FixtureManager>) -> Self {
        let name = name.into();
        let span = tracing::info_span!("fixture", name = %name);
        Self {
            name,
            manager: Arc::downgrade(manager),
            span,
        }
    }

    /// Create core state not bound to any manager
    ///
    /// For direct, one-off fixture invocations (debug runs, tests).
    #[must_use]
    pub fn detached(name: impl Into<String>) -> Self {
        let name = name.into();
        let span = tracing::info_span!("fixture", name = %name);
        Self {
            name,
            manager: Weak::new(),
            span,
        }
    }

    /// The canonical name of the owning fixture
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The manager that owns this fixture, if still alive and attached
    #[inline]
    #[must_use]
    pub fn manager(&self) -> Option<Arc<FixtureManager>> {
        self.manager.upgrade()
    }

    /// The tracing span keyed by this fixture's name
    #[inline]
    #[must_use]
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Sleep in one-second increments, logging the remaining time
    ///
    /// An indication that a long wait is not a deadlock. UX aid only; no
    /// correctness guarantees attach to the log cadence.
    pub async fn countdown_sleep(&self, sleep_time_seconds: f64) {
        let mut remaining = sleep_time_seconds;
        while remaining >= 0.0 {
            tracing::info!(
                parent: &self.span,
                remaining_secs = remaining.ceil(),
                "countdown"
            );
            tokio::time::sleep(Duration::from_secs(1)).await;
            remaining -= 1.0;
        }
    }

    /// Run tasks while the observer gates completion, returning the pending
    /// set
    ///
    /// A single observer task evaluates the side effects of the companions
    /// as a gate to continuing. Returns whatever is still running once the
    /// observer completes, regardless of how many companions finished
    /// alongside it. A non-positive `timeout_seconds` waits indefinitely.
    ///
    /// Use [`observe::observe`] directly when the completed tasks' outcomes
    /// need inspecting.
    ///
    /// # Errors
    /// [`FixtureError::Observe`] when the budget is exhausted before the
    /// observer completes.
    pub async fn observe_tasks<T, O, C>(
        &self,
        observer: O,
        timeout_seconds: f64,
        companions: C,
    ) -> Result<Vec<JoinHandle<T>>, FixtureError>
    where
        T: Send + 'static,
        O: Future<Output = T> + Send + 'static,
        C: IntoIterator,
        C::Item: Future<Output = T> + Send + 'static,
    {
        let observation = observe::observe(
            observer,
            observe::timeout_from_secs(timeout_seconds),
            companions,
        )
        .await?;
        tracing::debug!(
            parent: &self.span,
            done = observation.done.len(),
            pending = observation.pending.len(),
            "observer complete"
        );
        Ok(observation.pending)
    }

    /// Like [`observe_tasks`](Self::observe_tasks), but the observer must be
    /// the sole gate
    ///
    /// # Errors
    /// [`FixtureError::GateViolation`] if any companion completed by the
    /// time the observer did; [`FixtureError::Observe`] on timeout.
    pub async fn observe_tasks_assert_not_done<T, O, C>(
        &self,
        observer: O,
        timeout_seconds: f64,
        companions: C,
    ) -> Result<Vec<JoinHandle<T>>, FixtureError>
    where
        T: Send + 'static,
        O: Future<Output = T> + Send + 'static,
        C: IntoIterator,
        C::Item: Future<Output = T> + Send + 'static,
    {
        let observation = observe::observe(
            observer,
            observe::timeout_from_secs(timeout_seconds),
            companions,
        )
        .await?;
        if observation.companions_done() > 0 {
            return Err(FixtureError::GateViolation {
                completed: observation.done.len(),
            });
        }
        Ok(observation.pending)
    }
}
