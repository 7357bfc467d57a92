use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Errors when registering a service
#[derive(Error, Debug, Clone)]
pub enum RegisterError {
    /// A required constructor dependency has not been registered yet
    #[error("'{required_by}' needs '{dependency}' for parameter '{parameter}' - register '{dependency}' first")]
    MissingDependencyRegistration {
        dependency: TypeInfo,
        required_by: TypeInfo,
        parameter: &'static str,
    },
    /// The service is already registered and overwriting is disabled
    #[error("'{0}' is already registered")]
    AlreadyRegistered(TypeInfo),
}

/// Errors when resolving a service
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The requested service is not known
    #[error("'{0}' is not registered")]
    UnregisteredService(TypeInfo),
    /// A constructor parameter has no explicit value, no registered service and no default
    #[error("Cannot resolve parameter '{parameter}' of '{service}'")]
    UnresolvableParameter {
        parameter: &'static str,
        service: TypeInfo,
    },
    /// A scoped service was requested while no scope is open
    #[error("'{0}' is scoped, but there is no active scope")]
    NoActiveScope(TypeInfo),
    /// The service depends on itself
    #[error("A Circular Dependency exists between '{from}' and '{to}' through {chain:?}")]
    CyclicDependency {
        from: TypeInfo,
        to: TypeInfo,
        chain: Vec<TypeInfo>,
    },
    /// The dependency chain grew beyond the configured maximum
    #[error("Resolving '{service}' exceeded the maximum depth of {max_depth}")]
    ResolutionDepthExceeded { service: TypeInfo, max_depth: usize },
    /// The constructor or factory of a service failed
    #[error("Construction of '{service}' failed - error: {error}")]
    ConstructionFailed {
        service: TypeInfo,
        error: Arc<DynError>,
    },
    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors when reading an argument inside a constructor or factory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Argument '{0}' was not provided")]
    Missing(String),
    #[error("Argument '{name}' is a '{actual}', but '{expected}' was requested")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}
