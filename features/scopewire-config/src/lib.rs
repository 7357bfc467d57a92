//! Scopewire Config provides a registry of configs that can be injected in services
//! resolved by a [`scopewire_di::Injector`].
//!
//! Scopewire Config is split into two major parts:
//! 1. ConfigProvider: Used to create the registry of all configs and install it into an Injector
//! 2. Config<T>: A wrapper type to declare and read configs as constructor dependencies
//!
//! # Examples
//!
//! ```rust
//! use scopewire_config::ConfigProvider;
//!
//! #[derive(Clone)]
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut config_provider = ConfigProvider::new();
//! config_provider
//!     .add_config(AppConfig {
//!         host: "localhost".to_string(),
//!         port: 8080,
//!     })
//!     .unwrap()
//!     .maybe_add_config::<u64>(None)
//!     .unwrap();
//!
//! let retrieved_config = config_provider.require_config::<AppConfig>().unwrap();
//! assert_eq!(retrieved_config.host, "localhost");
//! assert_eq!(retrieved_config.port, 8080);
//! assert!(config_provider.get_config::<u64>().is_none());
//! ```

pub mod config;
pub mod errors;
pub mod provider;

pub use config::Config;
pub use errors::ConfigError;
pub use provider::ConfigProvider;
