//! Fixture manager: per-scope registry and singleton cache
//!
//! A [`FixtureManager`] scopes a set of fixtures, providing a common context
//! across command-line and test-runner environments. It discovers fixture
//! types through its [`FixtureRegistry`] and guarantees one-and-only-one
//! live instance per canonical name.

use crate::arguments::Arguments;
use crate::error::FixtureError;
use crate::fixture::Fixture;
use crate::registry::{FixtureRegistry, FixtureType};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Cache state for one canonical name
enum CacheSlot {
    /// Construction in flight; a same-name request at this point is a cycle
    Building,
    /// Live instance
    Ready(Arc<dyn Fixture>),
}

/// Scope-level owner of fixture instances
///
/// Created once per top-level run. The instance cache is the single source
/// of truth for "does this fixture already exist in this scope": entries are
/// created lazily on first request and never evicted within the manager's
/// lifetime.
pub struct FixtureManager {
    registry: FixtureRegistry,
    cache: Mutex<HashMap<String, CacheSlot>>,
    visited: Mutex<HashSet<String>>,
}

impl FixtureManager {
    /// Create a manager owning the given registry
    ///
    /// Returned behind `Arc` because fixtures hold a weak back-reference to
    /// their manager.
    #[must_use]
    pub fn new(registry: FixtureRegistry) -> Arc<Self> {
        Arc::new(Self {
            registry,
            cache: Mutex::new(HashMap::new()),
            visited: Mutex::new(HashSet::new()),
        })
    }

    /// Borrow the capability registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &FixtureRegistry {
        &self.registry
    }

    /// Every fixture type known to this manager
    ///
    /// Lazy and restartable; yields the registry's order. The types may or
    /// may not have been instantiated yet.
    pub fn fixture_types(&self) -> impl Iterator<Item = &FixtureType> {
        self.registry.iter()
    }

    /// Get a fixture instance, creating it if it wasn't already
    ///
    /// One-and-only-one fixture instance exists per canonical name for this
    /// manager: repeated calls with the same name return the identical
    /// instance. This identity stability is load-bearing for any code that
    /// keys state off fixture instances.
    ///
    /// Constructors may call back into the manager for *other* fixtures;
    /// the cache lock is not held across construction.
    ///
    /// # Errors
    /// - [`FixtureError::NotFound`] when no registered type's canonical name
    ///   matches.
    /// - [`FixtureError::ConstructionCycle`] when a fixture requests itself,
    ///   directly or indirectly, during its own construction.
    pub fn get_fixture(
        self: &Arc<Self>,
        fixture_name: &str,
    ) -> Result<Arc<dyn Fixture>, FixtureError> {
        let fixture_type = {
            let mut cache = self.cache.lock();
            match cache.get(fixture_name) {
                Some(CacheSlot::Ready(fixture)) => return Ok(Arc::clone(fixture)),
                Some(CacheSlot::Building) => {
                    return Err(FixtureError::ConstructionCycle(fixture_name.to_string()))
                }
                None => {}
            }

            let fixture_type = self
                .registry
                .find(fixture_name)
                .ok_or_else(|| FixtureError::NotFound(fixture_name.to_string()))?
                .clone();

            // Reserve the name before releasing the lock so a re-entrant
            // same-name request fails fast instead of double-constructing.
            cache.insert(fixture_name.to_string(), CacheSlot::Building);
            fixture_type
        };

        let fixture = fixture_type.construct(self);
        tracing::debug!(name = fixture_name, "fixture constructed");

        self.cache.lock().insert(
            fixture_name.to_string(),
            CacheSlot::Ready(Arc::clone(&fixture)),
        );
        Ok(fixture)
    }

    /// Check whether an instance already exists for a canonical name
    #[must_use]
    pub fn has_fixture(&self, fixture_name: &str) -> bool {
        matches!(
            self.cache.lock().get(fixture_name),
            Some(CacheSlot::Ready(_))
        )
    }

    /// Declare every known type's parameters to the argument collector
    ///
    /// Each type's visitor runs at most once per manager lifetime, no matter
    /// how many times this is called. The results are the collector's
    /// business; the core does not interpret them.
    pub fn visit_test_arguments(&self, arguments: &mut dyn Arguments) {
        let mut visited = self.visited.lock();
        for fixture_type in self.registry.iter() {
            if visited.insert(fixture_type.canonical_name().to_string()) {
                fixture_type.visit_test_arguments(arguments);
            }
        }
    }
}

impl std::fmt::Debug for FixtureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureManager")
            .field("registered_types", &self.registry.len())
            .field("cached_instances", &self.cache.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::ArgumentSpec;
    use crate::fixture::{FixtureCore, FixtureFactory};
    use async_trait::async_trait;
    use harvest_artifact::{Artifacts, Namespace};
    use serde_json::Value;
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TempProbe {
        core: FixtureCore,
    }

    #[async_trait]
    impl Fixture for TempProbe {
        fn core(&self) -> &FixtureCore {
            &self.core
        }

        async fn gather(&self, _args: &Namespace) -> Result<Artifacts, FixtureError> {
            Ok(Artifacts::new(0))
        }
    }

    impl FixtureFactory for TempProbe {
        fn fixture_name() -> Cow<'static, str> {
            Cow::Borrowed("temp_probe")
        }

        fn create(manager: &Arc<FixtureManager>) -> Self {
            Self {
                core: FixtureCore::new(Self::fixture_name(), manager),
            }
        }

        fn visit_test_arguments(arguments: &mut dyn Arguments) {
            arguments.add_argument(ArgumentSpec::new("--temp-units").with_default("celsius"));
        }
    }

    #[derive(Default)]
    struct RecordingArguments {
        added: Vec<String>,
    }

    impl Arguments for RecordingArguments {
        fn add_argument(&mut self, argument: ArgumentSpec) {
            self.added.push(argument.name().to_string());
        }

        fn set_default(&mut self, _key: &str, _value: Value) {}
    }

    fn manager_with_temp_probe() -> Arc<FixtureManager> {
        let mut registry = FixtureRegistry::new();
        registry.register_factory::<TempProbe>();
        FixtureManager::new(registry)
    }

    #[tokio::test]
    async fn get_fixture_is_identity_stable() {
        let manager = manager_with_temp_probe();

        let first = manager.get_fixture("temp_probe").unwrap();
        let second = manager.get_fixture("temp_probe").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "temp_probe");
        assert!(manager.has_fixture("temp_probe"));
    }

    #[tokio::test]
    async fn get_fixture_unknown_name_fails() {
        let manager = manager_with_temp_probe();
        let result = manager.get_fixture("missing");
        assert!(matches!(result, Err(FixtureError::NotFound(_))));
        assert!(!manager.has_fixture("missing"));
    }

    #[tokio::test]
    async fn construction_happens_at_most_once() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&constructed);

        let mut registry = FixtureRegistry::new();
        registry.register(FixtureType::new("counting", move |manager| {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(TempProbe {
                core: FixtureCore::new("counting", manager),
            })
        }));
        let manager = FixtureManager::new(registry);

        let first = manager.get_fixture("counting").unwrap();
        let second = manager.get_fixture("counting").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(constructed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reentrant_same_name_construction_fails_fast() {
        let seen: Arc<Mutex<Option<FixtureError>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);

        let mut registry = FixtureRegistry::new();
        registry.register(FixtureType::new("ouroboros", move |manager| {
            *slot.lock() = manager.get_fixture("ouroboros").err();
            Arc::new(TempProbe {
                core: FixtureCore::new("ouroboros", manager),
            })
        }));
        let manager = FixtureManager::new(registry);

        let fixture = manager.get_fixture("ouroboros").unwrap();
        assert_eq!(fixture.name(), "ouroboros");
        assert!(matches!(
            seen.lock().take(),
            Some(FixtureError::ConstructionCycle(_))
        ));
    }

    #[tokio::test]
    async fn construction_may_request_other_fixtures() {
        let mut registry = FixtureRegistry::new();
        registry.register_factory::<TempProbe>();
        registry.register(FixtureType::new("aggregate", |manager| {
            // The cache lock is released during construction, so pulling a
            // dependency here must succeed.
            let dependency = manager.get_fixture("temp_probe").unwrap();
            Arc::new(TempProbe {
                core: FixtureCore::new(dependency.name().to_string() + "_aggregate", manager),
            })
        }));
        let manager = FixtureManager::new(registry);

        let fixture = manager.get_fixture("aggregate").unwrap();
        assert_eq!(fixture.name(), "temp_probe_aggregate");
        assert!(manager.has_fixture("temp_probe"));
    }

    #[tokio::test]
    async fn fixture_types_enumeration_is_restartable() {
        let manager = manager_with_temp_probe();
        assert_eq!(manager.fixture_types().count(), 1);
        assert_eq!(manager.fixture_types().count(), 1);
    }

    #[tokio::test]
    async fn arguments_visited_once_per_type() {
        let manager = manager_with_temp_probe();
        let mut arguments = RecordingArguments::default();

        manager.visit_test_arguments(&mut arguments);
        manager.visit_test_arguments(&mut arguments);

        assert_eq!(arguments.added, vec!["--temp-units".to_string()]);
    }
}
