use std::{any::TypeId, collections::HashMap, sync::Arc};

use crate::{
    builder::InjectorConfig,
    cache::{ScopeStack, SingletonCache},
    errors::ResolveError,
    lifetime::Lifetime,
    parameters::{Argument, Arguments, Parameter},
    registry::{Recipe, RegistrationTable},
    target::TargetKind,
    types::{Instance, TypeInfo},
};

/// Mutable state of an Injector, always accessed under its lock
#[derive(Default)]
pub(crate) struct InjectorState {
    pub registry: RegistrationTable,
    pub singletons: SingletonCache,
    pub scopes: ScopeStack,
}

/// Everything a resolution let go of
///
/// Dropping these may run `Drop` impls of services, which is only allowed
/// once the Injector's lock is released.
#[derive(Default)]
#[must_use = "released values must be dropped after the lock is released"]
pub(crate) struct Released {
    arguments: Vec<Arguments>,
    instances: Vec<Instance>,
}
impl Released {
    pub fn len(&self) -> usize {
        self.arguments.len() + self.instances.len()
    }
}

/// One top level resolution and everything it resolves on the way
///
/// Instances created for cached lifetimes are kept aside until [Resolution::commit],
/// so a failed resolution leaves every cache untouched.
pub(crate) struct Resolution<'a> {
    state: &'a mut InjectorState,
    config: &'a InjectorConfig,
    /// Services currently under construction, outermost first
    chain: Vec<TypeInfo>,
    singletons: HashMap<TypeId, Instance>,
    scoped: HashMap<TypeId, Instance>,
    released: Released,
}
impl<'a> Resolution<'a> {
    pub fn new(state: &'a mut InjectorState, config: &'a InjectorConfig) -> Self {
        Resolution {
            state,
            config,
            chain: Vec::new(),
            singletons: HashMap::new(),
            scoped: HashMap::new(),
            released: Released::default(),
        }
    }

    /// Resolves a service, constructing its dependencies depth first
    pub fn resolve(&mut self, service: TypeInfo) -> Result<Instance, ResolveError> {
        let Some(recipe) = self.state.registry.get(&service).cloned() else {
            tracing::error!("Tried to resolve an unregistered service: {}", service);
            return Err(ResolveError::UnregisteredService(service));
        };

        if let Some(instance) = self.cached(&recipe)? {
            tracing::trace!("Reusing {} instance of {}", recipe.lifetime, service);
            return Ok(instance);
        }

        // Circular Dependency Check
        if let Some(&from) = self.chain.first() {
            if self.chain.contains(&service) {
                let mut chain = self.chain.clone();
                chain.push(service);
                tracing::error!("Circular dependency while resolving {}: {:?}", from, chain);
                return Err(ResolveError::CyclicDependency {
                    from,
                    to: service,
                    chain,
                });
            }
        }

        if self.chain.len() >= self.config.max_resolution_depth {
            return Err(ResolveError::ResolutionDepthExceeded {
                service,
                max_depth: self.config.max_resolution_depth,
            });
        }

        self.chain.push(service);
        let constructed = self.construct(&recipe);
        self.chain.pop();
        let instance = constructed?;

        tracing::debug!("Constructed {} instance of {}", recipe.lifetime, service);
        match recipe.lifetime {
            Lifetime::Singleton => {
                self.singletons.insert(service.type_id, instance.clone());
            }
            Lifetime::Scoped => {
                self.scoped.insert(service.type_id, instance.clone());
            }
            Lifetime::Transient => {}
        }

        Ok(instance)
    }

    /// Moves all instances created by this resolution into the caches
    ///
    /// On error nothing is cached and the resolved instance is released as well.
    pub fn commit(mut self, resolved: Instance) -> (Result<Instance, ResolveError>, Released) {
        if !self.scoped.is_empty() && !self.state.scopes.is_active() {
            let service = resolved.info;
            self.released.instances.push(resolved);
            return (Err(ResolveError::NoActiveScope(service)), self.rollback());
        }

        for (_, instance) in self.scoped.drain() {
            if let Err(instance) = self.state.scopes.insert(instance) {
                self.released.instances.push(instance);
            }
        }
        for (_, instance) in self.singletons.drain() {
            self.state.singletons.insert(instance);
        }

        (Ok(resolved), self.released)
    }

    /// Discards all instances created by this resolution
    pub fn rollback(mut self) -> Released {
        let pending = self.singletons.into_values().chain(self.scoped.into_values());
        self.released.instances.extend(pending);
        self.released
    }

    /// Looks up an existing instance according to the recipe's lifetime
    fn cached(&self, recipe: &Recipe) -> Result<Option<Instance>, ResolveError> {
        let service = &recipe.service;
        let cached = match recipe.lifetime {
            Lifetime::Singleton => self
                .state
                .singletons
                .get(service)
                .or_else(|| self.singletons.get(&service.type_id)),
            Lifetime::Scoped => {
                if !self.state.scopes.is_active() {
                    tracing::error!("Tried to resolve scoped {} without an active scope", service);
                    return Err(ResolveError::NoActiveScope(*service));
                }

                self.state
                    .scopes
                    .get(service)
                    .or_else(|| self.scoped.get(&service.type_id))
            }
            Lifetime::Transient => None,
        };

        Ok(cached.cloned())
    }

    fn construct(&mut self, recipe: &Recipe) -> Result<Instance, ResolveError> {
        let (construct, args) = match &recipe.target {
            TargetKind::Class {
                parameters,
                construct,
            } => (construct, self.assemble(recipe, parameters)?),
            // Factories get the explicit parameters as their full argument set
            TargetKind::Factory { construct } => {
                (construct, Arguments::from(recipe.parameters.clone()))
            }
        };

        let constructed = construct(&args);
        self.released.arguments.push(args);

        constructed.map_err(|error| {
            tracing::error!("Construction of {} failed - error: {}", recipe.service, error);
            ResolveError::ConstructionFailed {
                service: recipe.service,
                error: Arc::new(error),
            }
        })
    }

    /// Builds the argument set in declaration order
    ///
    /// Explicit parameter, then registered service, then default.
    fn assemble(
        &mut self,
        recipe: &Recipe,
        parameters: &[Parameter],
    ) -> Result<Arguments, ResolveError> {
        let mut args = Arguments::default();

        for param in parameters {
            let registered = param
                .dependency()
                .filter(|dependency| self.state.registry.contains(dependency));

            let argument = if let Some(explicit) = recipe.parameters.get(param.name) {
                explicit.clone()
            } else if let Some(dependency) = registered {
                match self.resolve(dependency) {
                    Ok(instance) => Argument::from_instance(instance),
                    Err(error) => {
                        self.released.arguments.push(args);
                        return Err(error);
                    }
                }
            } else if let Some(default) = &param.default {
                default.clone()
            } else {
                self.released.arguments.push(args);
                return Err(ResolveError::UnresolvableParameter {
                    parameter: param.name,
                    service: recipe.service,
                });
            };

            args.insert(param.name, argument);
        }

        Ok(args)
    }
}
