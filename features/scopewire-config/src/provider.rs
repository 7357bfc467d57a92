use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use scopewire_di::{Injector, RegisterError, TypeInfo};

use crate::{config::Config, errors::ConfigError};

type Installer = Box<dyn Fn(&Injector) -> Result<(), RegisterError> + Send + Sync>;

struct ConfigEntry {
    info: TypeInfo,
    /// The `Config<T>` service it is installed as
    service: TypeInfo,
    value: Arc<dyn Any + Send + Sync + 'static>,
    install: Installer,
}

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type,
/// and installed into an [Injector] as `Config<T>` singletons.
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, ConfigEntry>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a config with specified type.
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.configs
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.clone().downcast().ok())
    }

    /// Retrieve a config with specified type, failing if it is not registered
    pub fn require_config<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ConfigError> {
        self.get_config()
            .ok_or_else(|| ConfigError::Missing(TypeInfo::of::<T>()))
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`ConfigError`] runtime error
    pub fn add_config<T: Send + Sync + 'static>(
        &mut self,
        config: T,
    ) -> Result<&mut Self, ConfigError> {
        let info = TypeInfo::of::<T>();

        if self.configs.contains_key(&info.type_id) {
            return Err(ConfigError::AlreadyRegistered(info));
        }

        let config = Arc::new(config);
        let installed = config.clone();
        self.configs.insert(
            info.type_id,
            ConfigEntry {
                info,
                service: TypeInfo::of::<Config<T>>(),
                value: config,
                install: Box::new(move |injector| {
                    injector.register_instance(Arc::new(Config::new(installed.clone())))
                }),
            },
        );

        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    /// Registers every config as a `Config<T>` singleton
    ///
    /// Must run before services depending on a config are registered.
    /// If the Injector does not allow overwrites and any config is already
    /// installed, nothing is registered.
    pub fn install(&self, injector: &Injector) -> Result<(), ConfigError> {
        if !injector.config().allow_overwrite {
            let installed = self
                .configs
                .values()
                .find(|entry| injector.contains(&entry.service));
            if let Some(entry) = installed {
                tracing::error!("Config {} is already installed", entry.info);
                return Err(RegisterError::AlreadyRegistered(entry.service).into());
            }
        }

        for entry in self.configs.values() {
            (entry.install)(injector)?;
            tracing::debug!("Installed config {}", entry.info);
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
