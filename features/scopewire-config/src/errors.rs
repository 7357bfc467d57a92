use scopewire_di::{RegisterError, TypeInfo};

/// Errors of the config registry
#[derive(thiserror::Error, Debug, Clone)]
pub enum ConfigError {
    /// The required Config is not known
    #[error("The required Config type '{0}' is not known")]
    Missing(TypeInfo),
    /// The Config is already registered
    #[error("The Config type '{0}' is already registered")]
    AlreadyRegistered(TypeInfo),
    /// Installing a Config into the Injector failed
    #[error(transparent)]
    Install(#[from] RegisterError),
}
