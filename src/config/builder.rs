use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::env::{apply_env, Environment, ProcessEnv};
use super::file::load_config_file;
use super::path;
use super::schema::{self, DEFAULTS};
use super::types::Config;
use super::validate::Validator;
use super::ConfigError;

/// Loads the server configuration.
///
/// Loading runs three stages, each completing before the next:
///
/// 1. the JSON config file is decoded (see [`load_config_file`]),
/// 2. mapped environment variables override file values,
/// 3. built-in defaults fill attributes that are still empty.
///
/// The result is then validated; every failing attribute is collected into
/// a single [`ConfigError::Validation`].
///
/// ## Example
///
/// ```no_run
/// use semaphore_config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_file("/etc/semaphore/config.json")
///     .load()?;
///
/// println!("listening on {}{}", config.interface, config.port);
/// # Ok::<(), semaphore_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    env: Arc<dyn Environment>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            path: None,
            env: Arc::new(ProcessEnv),
        }
    }
}

impl ConfigLoader {
    /// Creates a loader reading the process environment and searching the
    /// default file locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads this file instead of searching for one.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads environment variables from `env` instead of the process.
    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Runs all stages and validation.
    pub fn load(self) -> Result<Config, ConfigError> {
        schema::verify_tables()?;

        tracing::info!("loading config");
        let (path, mut config) = load_config_file(self.path.as_deref(), self.env.as_ref())?;
        tracing::info!(path = %path.display(), "decoded config file");

        self.resolve(&mut config)?;

        tracing::info!("validating config");
        validate(&mut config)?;

        Ok(config)
    }

    /// Applies the environment and defaults stages to an already decoded
    /// record.
    pub fn resolve(&self, config: &mut Config) -> Result<(), ConfigError> {
        apply_env(config, self.env.as_ref())?;
        apply_defaults(config)
    }
}

/// Sets every attribute in [`DEFAULTS`] that is still empty.
pub fn apply_defaults(config: &mut Config) -> Result<(), ConfigError> {
    for (attribute, default) in DEFAULTS {
        if path::get(&*config, attribute)?.is_empty() {
            path::set(&mut *config, attribute, *default)?;
        }
    }
    Ok(())
}

/// Validates with the built-in rules, failing with all messages at once.
pub fn validate(config: &mut Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();
    Validator::builtin()?.validate(config, |message| {
        tracing::warn!("{message}");
        errors.push(message);
    })?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    fn env(vars: &[(&str, &str)]) -> BTreeMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    fn keys_json() -> String {
        format!(
            r#""cookie_hash": "{KEY}", "cookie_encryption": "{KEY}", "access_key_encryption": "{KEY}""#
        )
    }

    #[test]
    fn test_defaults_fill_only_empty_values() {
        let mut config = Config {
            tmp_path: "/srv/tmp".into(),
            ..Config::default()
        };
        apply_defaults(&mut config).unwrap();

        assert_eq!(config.port, ":3000");
        assert_eq!(config.git_client, "go_git");
        assert_eq!(config.tmp_path, "/srv/tmp");
    }

    #[test]
    fn test_defaults_table_property() {
        for (attribute, default) in DEFAULTS {
            let mut empty = Config::default();
            apply_defaults(&mut empty).unwrap();
            assert_eq!(path::get(&empty, attribute).unwrap(), *default);

            let mut set = Config::default();
            path::set(&mut set, attribute, "custom").unwrap();
            apply_defaults(&mut set).unwrap();
            assert_eq!(path::get(&set, attribute).unwrap(), "custom");
        }
    }

    #[test]
    fn test_load_full_pipeline() {
        let file = config_file(&format!(
            r#"{{"port": "4000", "tmp_path": "/from/file", "mysql": {{"host": "file-db"}}, {}}}"#,
            keys_json()
        ));
        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env(env(&[("SEMAPHORE_TMP_PATH", "/from/env")]))
            .load()
            .unwrap();

        assert_eq!(config.port, ":4000");
        assert_eq!(config.tmp_path, "/from/env");
        assert_eq!(config.git_client, "go_git");
        assert_eq!(config.mysql.hostname, "file-db");
    }

    #[test]
    fn test_load_collects_validation_errors() {
        let file = config_file(r#"{"git_client": "svn", "email_password": "x"}"#);
        let result = ConfigLoader::new()
            .with_file(file.path())
            .with_env(env(&[]))
            .load();

        let errors = match result {
            Err(ConfigError::Validation { errors }) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        };
        assert!(errors.iter().any(|e| e.contains("git_client")));
        assert!(errors.iter().any(|e| e.contains("cookie_hash")));
        assert!(errors.iter().any(|e| e.contains("access_key_encryption")));
    }

    #[test]
    fn test_load_coercion_error_from_env() {
        let file = config_file("{}");
        let result = ConfigLoader::new()
            .with_file(file.path())
            .with_env(env(&[("SEMAPHORE_MAX_PARALLEL_TASKS", "ten")]))
            .load();
        assert!(matches!(result, Err(ConfigError::Coercion { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigLoader::new()
            .with_file("/nonexistent/semaphore/config.json")
            .with_env(env(&[]))
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
