//! Storage dialect selection and connection descriptors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use super::env::Environment;
use super::types::{Config, DbConfig};
use super::{ConfigError, DialectError};

/// Read-time overrides for the active database, independent of the
/// loader's environment stage.
pub const DB_HOST_VAR: &str = "SEMAPHORE_DB_HOST";
pub const DB_USER_VAR: &str = "SEMAPHORE_DB_USER";
pub const DB_PASS_VAR: &str = "SEMAPHORE_DB_PASS";
pub const DB_NAME_VAR: &str = "SEMAPHORE_DB_NAME";

/// A supported storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbDialect {
    MySql,
    Bolt,
    Postgres,
}

impl DbDialect {
    pub fn as_str(self) -> &'static str {
        match self {
            DbDialect::MySql => "mysql",
            DbDialect::Bolt => "bolt",
            DbDialect::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DbDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbDialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysql" => Ok(DbDialect::MySql),
            "bolt" => Ok(DbDialect::Bolt),
            "postgres" => Ok(DbDialect::Postgres),
            other => Err(DialectError::Unsupported(other.to_string())),
        }
    }
}

impl Config {
    fn db_settings(&self, dialect: DbDialect) -> &DbConfig {
        match dialect {
            DbDialect::MySql => &self.mysql,
            DbDialect::Bolt => &self.bolt,
            DbDialect::Postgres => &self.postgres,
        }
    }

    /// Returns the active storage dialect.
    ///
    /// An explicit `dialect` wins. Otherwise the first of MySQL, BoltDB and
    /// Postgres with an effective hostname is chosen.
    pub fn dialect(&self, env: &dyn Environment) -> Result<DbDialect, ConfigError> {
        if !self.dialect.is_empty() {
            return Ok(self.dialect.parse()?);
        }

        [DbDialect::MySql, DbDialect::Bolt, DbDialect::Postgres]
            .into_iter()
            .find(|dialect| is_present(self.db_settings(*dialect), env))
            .ok_or(ConfigError::Dialect(DialectError::NotConfigured))
    }

    /// Returns the settings of the active storage backend.
    pub fn database<'a>(&'a self, env: &'a dyn Environment) -> Result<Database<'a>, ConfigError> {
        let dialect = self.dialect(env)?;
        Ok(Database {
            dialect,
            settings: self.db_settings(dialect),
            env,
        })
    }
}

fn is_present(settings: &DbConfig, env: &dyn Environment) -> bool {
    !effective(env, DB_HOST_VAR, &settings.hostname).is_empty()
}

fn effective(env: &dyn Environment, var: &str, configured: &str) -> String {
    env.non_empty(var)
        .unwrap_or_else(|| configured.to_string())
}

/// The active storage backend and its settings.
#[derive(Debug, Clone, Copy)]
pub struct Database<'a> {
    dialect: DbDialect,
    settings: &'a DbConfig,
    env: &'a dyn Environment,
}

impl<'a> Database<'a> {
    pub fn dialect(&self) -> DbDialect {
        self.dialect
    }

    pub fn hostname(&self) -> String {
        effective(self.env, DB_HOST_VAR, &self.settings.hostname)
    }

    pub fn username(&self) -> String {
        effective(self.env, DB_USER_VAR, &self.settings.username)
    }

    pub fn password(&self) -> String {
        effective(self.env, DB_PASS_VAR, &self.settings.password)
    }

    pub fn db_name(&self) -> String {
        effective(self.env, DB_NAME_VAR, &self.settings.db_name)
    }

    /// Renders the driver-specific connection descriptor.
    ///
    /// BoltDB uses the hostname as a file path. MySQL gets
    /// `parseTime=true&interpolateParams=true` unless the configured options
    /// override them. The Postgres password is query-escaped.
    pub fn connection_string(&self, include_db_name: bool) -> String {
        let host = self.hostname();
        let user = self.username();
        let pass = self.password();
        let name = if include_db_name {
            self.db_name()
        } else {
            String::new()
        };

        match self.dialect {
            DbDialect::Bolt => host,
            DbDialect::MySql => {
                let mut options = BTreeMap::from([
                    ("interpolateParams".to_string(), "true".to_string()),
                    ("parseTime".to_string(), "true".to_string()),
                ]);
                options.extend(self.settings.options.clone());
                format!("{user}:{pass}@tcp({host})/{name}{}", query_string(&options))
            }
            DbDialect::Postgres => {
                let pass: String = form_urlencoded::byte_serialize(pass.as_bytes()).collect();
                let mut descriptor = format!("postgres://{user}:{pass}@{host}");
                if include_db_name {
                    descriptor.push('/');
                    descriptor.push_str(&name);
                }
                descriptor.push_str(&query_string(&self.settings.options));
                descriptor
            }
        }
    }

    /// One-line summary without credentials.
    pub fn describe(&self) -> String {
        match self.dialect {
            DbDialect::MySql => format!(
                "MySQL {}@{} {}",
                self.username(),
                self.hostname(),
                self.db_name()
            ),
            DbDialect::Bolt => format!("BoltDB {}", self.hostname()),
            DbDialect::Postgres => format!(
                "Postgres {}@{} {}",
                self.username(),
                self.hostname(),
                self.db_name()
            ),
        }
    }
}

fn query_string(options: &BTreeMap<String, String>) -> String {
    if options.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = options.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("?{}", pairs.join("&"))
}
