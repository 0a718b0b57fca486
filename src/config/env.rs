use std::collections::BTreeMap;

use super::path;
use super::schema::ENVIRONMENT_VARS;
use super::types::Config;
use super::ConfigError;

/// Read-only access to environment variables.
///
/// [`ProcessEnv`] reads the real process environment; a `BTreeMap` can stand
/// in for it where a fixed environment is wanted.
pub trait Environment: Send + Sync + std::fmt::Debug {
    fn var(&self, name: &str) -> Option<String>;

    /// Like [`var`](Self::var), but treats an empty value as unset.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

const STORAGE_GROUPS: &[&str] = &["mysql", "postgres", "bolt"];

/// Overlays environment variables from [`ENVIRONMENT_VARS`] onto `config`.
///
/// Entries of a storage group other than the selected dialect are skipped
/// without reading their variable. Unset and empty variables are ignored.
pub fn apply_env(config: &mut Config, env: &dyn Environment) -> Result<(), ConfigError> {
    for (attribute, var) in ENVIRONMENT_VARS {
        if let Some(group) = storage_group(attribute) {
            if group != config.dialect {
                continue;
            }
        }

        if let Some(value) = env.non_empty(var) {
            tracing::debug!(attribute, var, "applying environment override");
            path::set(&mut *config, attribute, value)?;
        }
    }

    Ok(())
}

fn storage_group(attribute: &str) -> Option<&'static str> {
    let (group, _) = attribute.split_once('.')?;
    STORAGE_GROUPS.iter().copied().find(|g| *g == group)
}
