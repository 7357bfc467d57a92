//! Scopewire DI resolves object graphs from registered construction recipes.
//!
//! The Injector consists of four parts:
//! 1. The registration table, mapping a service type to its [Target], [Lifetime]
//!    and explicit [Parameters]
//! 2. The resolver, building instances by resolving declared constructor parameters
//! 3. The lifetime caches - one singleton cache and a stack of scope frames
//! 4. The [ScopeGuard], which opens a scope and closes it again when dropped
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use scopewire_di::{Injector, Parameter, Registration, Target};
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! struct Greeter {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! let injector = Injector::new();
//! injector
//!     .register(
//!         Registration::new(Target::<dyn Logger>::factory(|_| Ok(Arc::new(ConsoleLogger))))
//!             .singleton(),
//!     )
//!     .unwrap();
//! injector
//!     .register(Target::class(
//!         [Parameter::service::<dyn Logger>("logger")],
//!         |args| {
//!             Ok(Arc::new(Greeter {
//!                 logger: args.service("logger")?,
//!             }))
//!         },
//!     ))
//!     .unwrap();
//!
//! let greeter = injector.get_instance::<Greeter>().unwrap();
//! greeter.logger.log("hello");
//! ```

pub mod builder;
pub mod cache;
pub mod container;
pub mod dependency_graph;
pub mod errors;
pub mod lifetime;
pub mod parameters;
pub mod registry;
pub mod scope;
pub mod target;
pub mod types;

mod resolver;

pub use builder::{InjectorBuilder, InjectorConfig};
pub use cache::ScopeId;
pub use container::Injector;
pub use dependency_graph::{
    DependencyGraph, DependencyGraphError, DependencyGraphErrors, DependencyInfo,
};
pub use errors::{ArgumentError, RegisterError, ResolveError};
pub use lifetime::Lifetime;
pub use parameters::{Argument, Arguments, Parameter, ParameterKind, Parameters};
pub use registry::Registration;
pub use scope::ScopeGuard;
pub use target::{Component, Target};
pub use types::{DynError, Injectable, Instance, TypeInfo};
