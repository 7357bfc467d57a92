use std::{marker::PhantomData, sync::Arc};

use crate::{
    parameters::{Arguments, Parameter},
    types::{DynError, Injectable, Instance},
};

/// A type which declares its constructor, so the Injector can build it
///
/// The parameter list replaces runtime signature inspection:
/// every parameter the constructor reads must be declared here.
pub trait Component: Sized + Send + Sync + 'static {
    /// Ordered list of constructor parameters
    fn parameters() -> Vec<Parameter>;

    /// Builds the component from the assembled arguments
    fn construct(args: &Arguments) -> Result<Self, DynError>;
}

/// Type erased construction routine
pub(crate) type ConstructFn = Arc<dyn Fn(&Arguments) -> Result<Instance, DynError> + Send + Sync>;

/// How instances of a service are produced
#[derive(Clone)]
pub(crate) enum TargetKind {
    /// Constructor with declared parameters, resolved by the Injector
    Class {
        parameters: Vec<Parameter>,
        construct: ConstructFn,
    },
    /// Routine invoked with the explicit parameters only
    Factory { construct: ConstructFn },
}

/// Construction recipe target for service `I`
pub struct Target<I: ?Sized> {
    pub(crate) kind: TargetKind,
    _provides: PhantomData<fn() -> Arc<I>>,
}

impl<I: ?Sized + Injectable> Target<I> {
    /// A constructor whose parameters are resolved by the Injector
    pub fn class<F>(parameters: impl IntoIterator<Item = Parameter>, construct: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Arc<I>, DynError> + Send + Sync + 'static,
    {
        Target {
            kind: TargetKind::Class {
                parameters: parameters.into_iter().collect(),
                construct: erase(construct),
            },
            _provides: PhantomData,
        }
    }

    /// A factory called with the registration's explicit parameters
    pub fn factory<F>(construct: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Arc<I>, DynError> + Send + Sync + 'static,
    {
        Target {
            kind: TargetKind::Factory {
                construct: erase(construct),
            },
            _provides: PhantomData,
        }
    }

    /// Binds the component `C` to the service `I`
    ///
    /// `coerce` turns the component into the service, usually `|c| c`.
    pub fn bind<C: Component>(coerce: fn(Arc<C>) -> Arc<I>) -> Self {
        Self::class(C::parameters(), move |args| {
            C::construct(args).map(|component| coerce(Arc::new(component)))
        })
    }

    /// The declared parameters, empty for factories
    pub fn parameters(&self) -> &[Parameter] {
        match &self.kind {
            TargetKind::Class { parameters, .. } => parameters.as_slice(),
            TargetKind::Factory { .. } => &[],
        }
    }

    pub fn is_factory(&self) -> bool {
        matches!(self.kind, TargetKind::Factory { .. })
    }
}

impl<C: Component> Target<C> {
    /// The component registered as itself
    pub fn component() -> Self {
        Self::bind::<C>(|component| component)
    }
}

fn erase<I, F>(construct: F) -> ConstructFn
where
    I: ?Sized + Injectable,
    F: Fn(&Arguments) -> Result<Arc<I>, DynError> + Send + Sync + 'static,
{
    Arc::new(move |args: &Arguments| construct(args).map(Instance::new))
}
