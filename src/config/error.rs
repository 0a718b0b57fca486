use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(
        "cannot find configuration! Use --config to point to a JSON file generated by `semaphore setup`"
    )]
    FileNotFound(Option<PathBuf>),

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("non-existent config attribute '{path}': {reason}")]
    Schema { path: String, reason: &'static str },

    #[error("cannot convert value '{value}' of setting '{path}' to an integer")]
    Coercion { path: String, value: String },

    #[error("invalid configuration:\n{}", errors.join("\n"))]
    Validation { errors: Vec<String> },

    #[error(transparent)]
    Dialect(#[from] DialectError),

    #[error("setting '{0}' is required; run `semaphore setup` to generate it")]
    MissingKey(&'static str),

    #[error("setting '{field}' is not valid base64: {source}")]
    InvalidKey {
        field: &'static str,
        source: base64::DecodeError,
    },

    #[error("setting 'web_host' is not a valid URL: {0}")]
    InvalidWebHost(#[from] url::ParseError),

    #[error("failed to render config: {0}")]
    Render(#[source] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DialectError {
    #[error("database configuration not found")]
    NotConfigured,

    #[error("unsupported database driver: {0}")]
    Unsupported(String),
}
