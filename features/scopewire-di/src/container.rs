use std::{any::type_name, fmt::Debug, sync::Arc};

use parking_lot::Mutex;

use crate::{
    builder::{InjectorBuilder, InjectorConfig},
    cache::ScopeId,
    dependency_graph::{DependencyGraph, DependencyGraphErrors},
    errors::{RegisterError, ResolveError},
    registry::{Recipe, Registration},
    resolver::{InjectorState, Resolution},
    scope::ScopeGuard,
    target::Target,
    types::{Injectable, TypeInfo},
};

/// Dependency injection container
///
/// Owns the registrations, the singleton cache and the stack of open scopes.
/// Cloning an Injector creates another handle to the same container.
///
/// All operations lock the container. A resolution keeps the lock for its whole
/// dependency tree, so constructors and factories must not call back into the
/// Injector resolving them.
#[derive(Clone)]
pub struct Injector(Arc<InjectorInner>);
struct InjectorInner {
    config: InjectorConfig,
    state: Mutex<InjectorState>,
}
impl Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.0.state.lock();
        let mut map = f.debug_struct("Injector");
        for recipe in state.registry.recipes() {
            map.field(recipe.service.type_name, &recipe.lifetime);
        }
        map.field("scope_depth", &state.scopes.depth());
        map.finish()
    }
}
impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl Injector {
    /// Creates an empty Injector with the default [InjectorConfig]
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    pub fn with_config(config: InjectorConfig) -> Self {
        Self(Arc::new(InjectorInner {
            config,
            state: Mutex::new(InjectorState::default()),
        }))
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.0.config
    }

    /// Registers the service `I`, replacing any previous registration
    ///
    /// Fails if a required constructor dependency is not registered yet.
    pub fn register<I: ?Sized + Injectable>(
        &self,
        registration: impl Into<Registration<I>>,
    ) -> Result<(), RegisterError> {
        self.insert_recipe(registration.into().into_recipe())
    }

    /// Registers an existing instance, every resolution returns this instance
    pub fn register_instance<I: ?Sized + Injectable>(
        &self,
        instance: Arc<I>,
    ) -> Result<(), RegisterError> {
        self.register(Registration::new(Target::factory(move |_| Ok(instance.clone()))).singleton())
    }

    pub(crate) fn insert_recipe(&self, recipe: Recipe) -> Result<(), RegisterError> {
        let allow_overwrite = self.0.config.allow_overwrite;
        let replaced = self.0.state.lock().registry.insert(recipe, allow_overwrite)?;

        // The replaced recipe may own an instance, dropped outside the lock
        drop(replaced);
        Ok(())
    }

    /// Resolves an instance of the service `I`
    ///
    /// Singletons are created once per Injector, scoped services once per
    /// innermost open scope and transient services on every call.
    pub fn get_instance<I: ?Sized + Injectable>(&self) -> Result<Arc<I>, ResolveError> {
        let service = TypeInfo::of::<I>();

        let (resolved, released) = {
            let mut state = self.0.state.lock();
            let mut resolution = Resolution::new(&mut state, &self.0.config);
            let finished = match resolution.resolve(service) {
                Ok(instance) => resolution.commit(instance),
                Err(error) => (Err(error), resolution.rollback()),
            };
            finished
        };

        // Dropped after the lock is released, services may use the Injector in Drop
        tracing::trace!("Releasing {} values of the resolution of {}", released.len(), service);
        drop(released);

        resolved?
            .downcast::<I>()
            .map_err(|actual_type| ResolveError::DowncastFailed {
                required_type: type_name::<I>(),
                actual_type,
            })
    }

    /// Opens a new innermost scope, closed when the guard is dropped
    pub fn open_scope(&self) -> ScopeGuard {
        let (id, depth) = {
            let mut state = self.0.state.lock();
            let id = state.scopes.open();
            (id, state.scopes.depth())
        };
        tracing::debug!("Opened {} at depth {}", id, depth);

        ScopeGuard::new(self.clone(), id)
    }

    pub(crate) fn close_scope(&self, id: ScopeId) {
        let closed = self.0.state.lock().scopes.close(id);

        // The frame is dropped here, after the lock is released
        match closed {
            Some((frame, true)) => {
                tracing::debug!("Closed {} releasing {} instances", id, frame.len());
            }
            Some((frame, false)) => {
                tracing::warn!(
                    "Closed {} while inner scopes are still open, releasing {} instances",
                    id,
                    frame.len()
                );
            }
            None => tracing::warn!("Tried to close unknown {}", id),
        }
    }

    pub fn is_registered<I: ?Sized + Injectable>(&self) -> bool {
        self.contains(&TypeInfo::of::<I>())
    }

    /// Like [Injector::is_registered], for an erased service identifier
    pub fn contains(&self, service: &TypeInfo) -> bool {
        self.0.state.lock().registry.contains(service)
    }

    /// Number of currently open scopes
    pub fn scope_depth(&self) -> usize {
        self.0.state.lock().scopes.depth()
    }

    /// Number of singleton instances created so far
    pub fn singleton_count(&self) -> usize {
        self.0.state.lock().singletons.len()
    }

    /// Snapshot of the current registrations and their dependencies
    pub fn graph(&self) -> DependencyGraph {
        DependencyGraph::new(&self.0.state.lock().registry)
    }

    /// Checks all registrations for circular dependencies
    pub fn validate(&self) -> Result<(), DependencyGraphErrors> {
        self.graph().check()
    }
}
