use std::{any::TypeId, collections::HashMap, sync::Arc};

use crate::{
    dependency_graph::DependencyInfo,
    errors::RegisterError,
    lifetime::Lifetime,
    parameters::{Parameter, Parameters},
    target::{Target, TargetKind},
    types::{Injectable, TypeInfo},
};

/// A registration request for the service `I`
///
/// Without an explicit lifetime the service is [`Lifetime::Transient`].
pub struct Registration<I: ?Sized> {
    target: Target<I>,
    lifetime: Lifetime,
    parameters: Parameters,
}
impl<I: ?Sized + Injectable> Registration<I> {
    pub fn new(target: Target<I>) -> Self {
        Registration {
            target,
            lifetime: Lifetime::default(),
            parameters: Parameters::new(),
        }
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn transient(self) -> Self {
        self.lifetime(Lifetime::Transient)
    }

    pub fn scoped(self) -> Self {
        self.lifetime(Lifetime::Scoped)
    }

    pub fn singleton(self) -> Self {
        self.lifetime(Lifetime::Singleton)
    }

    /// Replaces all explicit parameters
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Adds a single explicit parameter
    pub fn parameter<T: Injectable>(mut self, name: impl Into<String>, value: T) -> Self {
        self.parameters.insert(name, value);
        self
    }

    pub(crate) fn into_recipe(self) -> Recipe {
        Recipe {
            service: TypeInfo::of::<I>(),
            target: self.target.kind,
            lifetime: self.lifetime,
            parameters: self.parameters,
        }
    }
}
impl<I: ?Sized + Injectable> From<Target<I>> for Registration<I> {
    fn from(target: Target<I>) -> Self {
        Registration::new(target)
    }
}

/// The stored plan for producing instances of one service
pub(crate) struct Recipe {
    pub service: TypeInfo,
    pub target: TargetKind,
    pub lifetime: Lifetime,
    pub parameters: Parameters,
}
impl Recipe {
    pub fn declared_parameters(&self) -> &[Parameter] {
        match &self.target {
            TargetKind::Class { parameters, .. } => parameters.as_slice(),
            TargetKind::Factory { .. } => &[],
        }
    }

    /// Service dependencies of the constructor
    ///
    /// Dependencies covered by an explicit parameter are not listed,
    /// dependencies with a default are optional.
    pub fn dependencies(&self) -> Vec<DependencyInfo> {
        self.declared_parameters()
            .iter()
            .filter(|param| !self.parameters.contains(param.name))
            .filter_map(|param| {
                param.dependency().map(|type_info| DependencyInfo {
                    type_info,
                    parameter: param.name,
                    optional: param.has_default(),
                })
            })
            .collect()
    }
}

/// All recipes, keyed by service
#[derive(Default)]
pub(crate) struct RegistrationTable {
    recipes: HashMap<TypeId, Arc<Recipe>>,
}
impl RegistrationTable {
    /// Validates and stores a recipe, returning the recipe it replaced
    ///
    /// Every required dependency must already be registered.
    /// On error the table is left unchanged.
    pub fn insert(
        &mut self,
        recipe: Recipe,
        allow_overwrite: bool,
    ) -> Result<Option<Arc<Recipe>>, RegisterError> {
        let service = recipe.service;

        if !allow_overwrite && self.contains(&service) {
            return Err(RegisterError::AlreadyRegistered(service));
        }

        for dependency in recipe.dependencies() {
            if dependency.optional || self.contains(&dependency.type_info) {
                continue;
            }

            tracing::error!(
                "Registration of {} requires unregistered {} for parameter '{}'",
                service,
                dependency.type_info,
                dependency.parameter
            );
            return Err(RegisterError::MissingDependencyRegistration {
                dependency: dependency.type_info,
                required_by: service,
                parameter: dependency.parameter,
            });
        }

        let lifetime = recipe.lifetime;
        let replaced = self.recipes.insert(service.type_id, Arc::new(recipe));
        if replaced.is_some() {
            tracing::warn!("{} is already registered, overwriting", service);
        }
        tracing::debug!("Registered {} as {}", service, lifetime);

        Ok(replaced)
    }

    pub fn get(&self, service: &TypeInfo) -> Option<&Arc<Recipe>> {
        self.recipes.get(&service.type_id)
    }

    pub fn contains(&self, service: &TypeInfo) -> bool {
        self.recipes.contains_key(&service.type_id)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values().map(Arc::as_ref)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Repository;
    struct Service;

    fn repository() -> Recipe {
        Registration::new(Target::factory(|_| Ok(Arc::new(Repository)))).into_recipe()
    }

    fn service(parameters: Parameters) -> Recipe {
        Registration::new(Target::class(
            [Parameter::service::<Repository>("repository")],
            |_| Ok(Arc::new(Service)),
        ))
        .parameters(parameters)
        .into_recipe()
    }

    #[test]
    fn rejects_missing_dependency_and_keeps_table_unchanged() {
        let mut table = RegistrationTable::default();

        let err = table.insert(service(Parameters::new()), true).err().unwrap();
        match err {
            RegisterError::MissingDependencyRegistration {
                dependency,
                required_by,
                parameter,
            } => {
                assert_eq!(dependency, TypeInfo::of::<Repository>());
                assert_eq!(required_by, TypeInfo::of::<Service>());
                assert_eq!(parameter, "repository");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn dependencies_registered_first_are_accepted() {
        let mut table = RegistrationTable::default();
        table.insert(repository(), true).unwrap();
        table.insert(service(Parameters::new()), true).unwrap();

        assert!(table.contains(&TypeInfo::of::<Service>()));
    }

    #[test]
    fn explicit_parameter_covers_missing_dependency() {
        let mut table = RegistrationTable::default();
        let explicit = Parameters::new().with("repository", Arc::new(Repository));

        table.insert(service(explicit), true).unwrap();
        assert!(table.contains(&TypeInfo::of::<Service>()));
    }

    #[test]
    fn overwrite_can_be_disabled() {
        let mut table = RegistrationTable::default();
        table.insert(repository(), false).unwrap();
        table.insert(repository(), true).unwrap();

        let err = table.insert(repository(), false).err().unwrap();
        assert!(matches!(err, RegisterError::AlreadyRegistered(info) if info == TypeInfo::of::<Repository>()));
        assert_eq!(table.len(), 1);
    }
}
