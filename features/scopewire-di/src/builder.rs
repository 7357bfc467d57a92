use std::sync::Arc;

use crate::{
    container::Injector,
    errors::RegisterError,
    registry::{Recipe, Registration},
    target::Target,
    types::Injectable,
};

/// Settings of an [Injector]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorConfig {
    /// Longest dependency chain a single resolution may build
    pub max_resolution_depth: usize,
    /// If registering a service twice replaces the first registration
    pub allow_overwrite: bool,
}
impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 128,
            allow_overwrite: true,
        }
    }
}

//////////////////////////////////////////////////////////////////////
///
/// Collects settings and registrations, then builds the [Injector].
/// Registrations are applied in the order they were added,
/// so dependencies must still be added before their dependents.
pub struct InjectorBuilder {
    config: InjectorConfig,
    registrations: Vec<Recipe>,
}
impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectorBuilder {
    pub fn new() -> Self {
        InjectorBuilder {
            config: InjectorConfig::default(),
            registrations: Vec::new(),
        }
    }
}
impl InjectorBuilder {
    pub fn config(mut self, config: InjectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_resolution_depth(mut self, depth: usize) -> Self {
        self.config.max_resolution_depth = depth;
        self
    }

    pub fn allow_overwrite(mut self, allow: bool) -> Self {
        self.config.allow_overwrite = allow;
        self
    }

    pub fn add_instance<I: ?Sized + Injectable>(self, instance: Arc<I>) -> Self {
        self.add(Registration::new(Target::factory(move |_| Ok(instance.clone()))).singleton())
    }

    pub fn add<I: ?Sized + Injectable>(mut self, registration: impl Into<Registration<I>>) -> Self {
        self.registrations.push(registration.into().into_recipe());
        self
    }

    pub fn build(self) -> Result<Injector, RegisterError> {
        let InjectorBuilder {
            config,
            registrations,
        } = self;

        tracing::debug!(
            "Building injector with {} registrations",
            registrations.len()
        );

        let injector = Injector::with_config(config);
        for recipe in registrations {
            injector.insert_recipe(recipe)?;
        }

        Ok(injector)
    }
}
