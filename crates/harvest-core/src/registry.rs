//! Capability registry of fixture types
//!
//! Provides [`FixtureRegistry`], the lookup the manager discovers fixture
//! types through, and [`FixtureType`], the provider handle it yields. The
//! manager depends only on the enumerate/construct contract; how entries got
//! registered (static linkage, configuration, dynamic loading) is not its
//! concern.

use crate::arguments::Arguments;
use crate::fixture::{Fixture, FixtureFactory};
use crate::manager::FixtureManager;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type ConstructFn = dyn Fn(&Arc<FixtureManager>) -> Arc<dyn Fixture> + Send + Sync;
type VisitFn = dyn Fn(&mut dyn Arguments) + Send + Sync;

/// Provider handle for one registered fixture type
///
/// Carries the type's canonical name, its constructor, and its argument
/// visitor. Lookup is exact-match by canonical name, case-sensitive.
#[derive(Clone)]
pub struct FixtureType {
    name: Cow<'static, str>,
    construct: Arc<ConstructFn>,
    visit: Arc<VisitFn>,
}

impl FixtureType {
    /// Derive a handle from a statically linked fixture type
    #[must_use]
    pub fn of<F: FixtureFactory>() -> Self {
        Self {
            name: F::fixture_name(),
            construct: Arc::new(|manager: &Arc<FixtureManager>| -> Arc<dyn Fixture> {
                Arc::new(F::create(manager))
            }),
            visit: Arc::new(|arguments: &mut dyn Arguments| F::visit_test_arguments(arguments)),
        }
    }

    /// Build a handle from explicit parts
    ///
    /// For registration tables assembled at runtime (configuration-driven or
    /// dynamically loaded providers). The handle starts with a no-op
    /// argument visitor; attach one with
    /// [`with_arguments_visitor`](Self::with_arguments_visitor).
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        construct: impl Fn(&Arc<FixtureManager>) -> Arc<dyn Fixture> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            construct: Arc::new(construct),
            visit: Arc::new(|_: &mut dyn Arguments| {}),
        }
    }

    /// Attach an argument visitor to this handle
    #[must_use]
    pub fn with_arguments_visitor(
        mut self,
        visit: impl Fn(&mut dyn Arguments) + Send + Sync + 'static,
    ) -> Self {
        self.visit = Arc::new(visit);
        self
    }

    /// The stable identifier used for lookup and deduplication
    #[inline]
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        &self.name
    }

    /// Construct an instance bound to `manager`
    #[must_use]
    pub fn construct(&self, manager: &Arc<FixtureManager>) -> Arc<dyn Fixture> {
        (self.construct)(manager)
    }

    /// Declare this type's parameters to the argument collector
    pub fn visit_test_arguments(&self, arguments: &mut dyn Arguments) {
        (self.visit)(arguments);
    }
}

impl fmt::Debug for FixtureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of fixture type handles
///
/// Enumeration yields registration order. Registration is assumed static:
/// entries are added while assembling the registry and the set is fixed once
/// a manager takes ownership.
#[derive(Debug, Default, Clone)]
pub struct FixtureRegistry {
    types: Vec<FixtureType>,
}

impl FixtureRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Register a provider handle
    pub fn register(&mut self, fixture_type: FixtureType) {
        self.types.push(fixture_type);
    }

    /// Register a statically linked fixture type
    pub fn register_factory<F: FixtureFactory>(&mut self) {
        self.register(FixtureType::of::<F>());
    }

    /// Find a handle by canonical name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FixtureType> {
        self.types
            .iter()
            .find(|fixture_type| fixture_type.canonical_name() == name)
    }

    /// Check if a canonical name is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Iterate over registered handles in registration order
    pub fn iter(&self) -> impl Iterator<Item = &FixtureType> {
        self.types.iter()
    }

    /// Number of registered handles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
