pub mod config;
pub mod context;
mod error;

pub use config::{Config, ConfigError, ConfigLoader, DbDialect, DialectError, Environment, ProcessEnv};
pub use context::AppContext;
pub use error::Error;
