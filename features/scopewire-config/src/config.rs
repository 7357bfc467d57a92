use std::{ops::Deref, sync::Arc};

use scopewire_di::{ArgumentError, Arguments, Parameter};

/// A wrapper type to allow for config injections
///
/// Configs installed by a [`crate::provider::ConfigProvider`] are singleton services
/// of type `Config<T>`, constructors declare them like any other dependency.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use scopewire_config::{Config, ConfigProvider};
/// use scopewire_di::{Injector, Target};
///
/// pub struct PoolConfig {
///     size: usize,
/// }
/// pub struct Pool {
///     size: usize,
/// }
///
/// let injector = Injector::new();
/// let mut configs = ConfigProvider::new();
/// configs.add_config(PoolConfig { size: 4 }).unwrap();
/// configs.install(&injector).unwrap();
///
/// injector
///     .register(Target::class([Config::<PoolConfig>::parameter("config")], |args| {
///         let config = Config::<PoolConfig>::from_args(args, "config")?;
///         Ok(Arc::new(Pool { size: config.size }))
///     }))
///     .unwrap();
///
/// assert_eq!(injector.get_instance::<Pool>().unwrap().size, 4);
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Config<T> {
    pub(crate) fn new(inner: Arc<T>) -> Self {
        Config { inner }
    }

    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}
impl<T: Send + Sync + 'static> Config<T> {
    /// Constructor parameter receiving this config
    pub fn parameter(name: &'static str) -> Parameter {
        Parameter::service::<Config<T>>(name)
    }

    /// Reads the config from a constructor's arguments
    pub fn from_args(args: &Arguments, name: &str) -> Result<Config<T>, ArgumentError> {
        args.service::<Config<T>>(name)
            .map(|config| config.as_ref().clone())
    }
}
