//! Locating and decoding the configuration file.

use std::path::{Path, PathBuf};

use super::env::Environment;
use super::types::Config;
use super::ConfigError;

/// Environment variable naming the config file when no path is given.
pub const CONFIG_PATH_VAR: &str = "SEMAPHORE_CONFIG_PATH";

/// Last-resort location searched after the working directory.
pub const SYSTEM_CONFIG_PATH: &str = "/usr/local/etc/semaphore/config.json";

/// Reads the config file and decodes it into a [`Config`].
///
/// The file is the explicit `path`, else the one named by
/// [`CONFIG_PATH_VAR`], else the first existing of `{cwd}/config.json` and
/// [`SYSTEM_CONFIG_PATH`].
pub fn load_config_file(
    path: Option<&Path>,
    env: &dyn Environment,
) -> Result<(PathBuf, Config), ConfigError> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| env.non_empty(CONFIG_PATH_VAR).map(PathBuf::from));

    if let Some(path) = explicit {
        return match read_file(&path)? {
            Some(contents) => decode(&path, &contents).map(|config| (path, config)),
            None => Err(ConfigError::FileNotFound(Some(path))),
        };
    }

    let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
        path: PathBuf::from("."),
        source,
    })?;
    let candidates = [cwd.join("config.json"), PathBuf::from(SYSTEM_CONFIG_PATH)];
    load_first(&candidates)
}

/// Decodes the first candidate that exists. Candidates that fail with
/// anything other than "not found" are reported, not skipped.
pub fn load_first(candidates: &[PathBuf]) -> Result<(PathBuf, Config), ConfigError> {
    for path in candidates {
        if let Some(contents) = read_file(path)? {
            let config = decode(path, &contents)?;
            return Ok((path.clone(), config));
        }
        tracing::debug!(path = %path.display(), "config file not found");
    }
    Err(ConfigError::FileNotFound(None))
}

/// Returns `Ok(None)` if the file doesn't exist.
fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn decode(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
