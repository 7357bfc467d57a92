use std::{
    any::{type_name, Any},
    collections::HashMap,
    sync::Arc,
};

use crate::{
    errors::ArgumentError,
    types::{Injectable, Instance, TypeInfo},
};

/// A single type erased argument value
#[derive(Clone)]
pub struct Argument {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync + 'static>,
}
impl Argument {
    pub fn new<T: Injectable>(value: T) -> Self {
        Argument {
            type_name: type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Resolved services are passed on as their shared `Arc<I>` handle
    pub(crate) fn from_instance(instance: Instance) -> Self {
        Argument {
            type_name: instance.info.type_name,
            value: instance.instance,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}
impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Argument").field(&self.type_name).finish()
    }
}

/// What a constructor parameter expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Satisfied by resolving the given service
    Service(TypeInfo),
    /// A plain value, only satisfied by an explicit parameter or the default
    Value,
}

/// Declaration of one constructor parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub default: Option<Argument>,
}
impl Parameter {
    /// A parameter satisfied by the registered service `I`
    ///
    /// The constructor reads it with [`Arguments::service`]
    pub fn service<I: ?Sized + Injectable>(name: &'static str) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Service(TypeInfo::of::<I>()),
            default: None,
        }
    }

    /// A parameter without a service type
    pub fn value(name: &'static str) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Value,
            default: None,
        }
    }

    /// Used if neither an explicit parameter nor a registered service is available
    ///
    /// Defaults of service parameters must be the `Arc<I>` of the service.
    pub fn with_default<T: Injectable>(mut self, default: T) -> Self {
        self.default = Some(Argument::new(default));
        self
    }

    /// The service this parameter depends on, if any
    pub fn dependency(&self) -> Option<TypeInfo> {
        match self.kind {
            ParameterKind::Service(info) => Some(info),
            ParameterKind::Value => None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Explicit literal values for a registration, keyed by parameter name
///
/// Explicit values take precedence over registered services and defaults.
/// For factories they are the complete argument set.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    values: HashMap<String, Argument>,
}
impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Injectable>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<T: Injectable>(&mut self, name: impl Into<String>, value: T) -> &mut Self {
        self.values.insert(name.into(), Argument::new(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The assembled arguments handed to a constructor or factory
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: HashMap<String, Argument>,
}
impl Arguments {
    pub(crate) fn insert(&mut self, name: &str, argument: Argument) {
        self.values.insert(name.to_string(), argument);
    }

    /// Borrows the argument as `T`
    pub fn get<T: Injectable>(&self, name: &str) -> Result<&T, ArgumentError> {
        let argument = self
            .values
            .get(name)
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))?;

        argument
            .value
            .downcast_ref::<T>()
            .ok_or_else(|| ArgumentError::WrongType {
                name: name.to_string(),
                expected: type_name::<T>(),
                actual: argument.type_name,
            })
    }

    /// Clones the argument as `T`
    pub fn value<T: Injectable + Clone>(&self, name: &str) -> Result<T, ArgumentError> {
        self.get::<T>(name).cloned()
    }

    /// Returns the shared handle of a service argument
    pub fn service<I: ?Sized + Injectable>(&self, name: &str) -> Result<Arc<I>, ArgumentError> {
        self.get::<Arc<I>>(name)
            .cloned()
            .map_err(|error| match error {
                ArgumentError::WrongType { name, actual, .. } => ArgumentError::WrongType {
                    name,
                    expected: type_name::<I>(),
                    actual,
                },
                missing => missing,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
impl From<Parameters> for Arguments {
    fn from(parameters: Parameters) -> Self {
        Arguments {
            values: parameters.values,
        }
    }
}
