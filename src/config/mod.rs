//! Configuration loading and management.

mod builder;
mod database;
mod env;
mod error;
mod file;
pub mod path;
pub mod schema;
mod secrets;
mod types;
mod validate;

pub use builder::{apply_defaults, validate, ConfigLoader};
pub use database::{
    Database, DbDialect, DB_HOST_VAR, DB_NAME_VAR, DB_PASS_VAR, DB_USER_VAR,
};
pub use env::{apply_env, Environment, ProcessEnv};
pub use error::{ConfigError, DialectError};
pub use file::{load_config_file, CONFIG_PATH_VAR, SYSTEM_CONFIG_PATH};
pub use secrets::SecretKeys;
pub use types::{Config, DbConfig, LdapMappings, OidcEndpoint, OidcProvider};
pub use validate::{is_secret, normalize_port, Validator};
