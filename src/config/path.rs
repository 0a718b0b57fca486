//! Attribute access by dotted path.
//!
//! A path such as `mysql.hostname` is walked one segment at a time through
//! types implementing [`Attributes`]. Each implementation maps segment names
//! to real fields with a `match`, so the set of addressable paths is fixed
//! at compile time while callers (the environment and defaults tables) can
//! still address fields with plain strings.

use std::fmt;

use super::types::{Config, DbConfig, LdapMappings};
use super::ConfigError;

/// A scalar value passed to [`set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Flag(value)
    }
}

/// Read-only view of a named attribute.
pub enum Attribute<'a> {
    Group(&'a dyn Attributes),
    Text(&'a str),
    Integer(i64),
    Flag(bool),
}

/// Mutable view of a named attribute.
pub enum AttributeMut<'a> {
    Group(&'a mut dyn Attributes),
    Text(&'a mut String),
    Integer(&'a mut i64),
    Flag(&'a mut bool),
}

/// A record whose fields can be looked up by name at run time.
pub trait Attributes {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>>;
    fn attribute_mut(&mut self, name: &str) -> Option<AttributeMut<'_>>;
}

/// Returns the canonical string form of the leaf at `path`.
///
/// Fails with [`ConfigError::Schema`] when a segment does not exist or an
/// intermediate segment is not a group.
pub fn get(record: &dyn Attributes, path: &str) -> Result<String, ConfigError> {
    let (parents, leaf) = split_path(path)?;

    let mut group = record;
    for segment in parents {
        group = match group.attribute(segment) {
            Some(Attribute::Group(next)) => next,
            Some(_) => return Err(schema_error(path, "not a group")),
            None => return Err(schema_error(path, "no such attribute")),
        };
    }

    match group.attribute(leaf) {
        Some(Attribute::Text(s)) => Ok(s.to_string()),
        Some(Attribute::Integer(i)) => Ok(i.to_string()),
        Some(Attribute::Flag(b)) => Ok(b.to_string()),
        Some(Attribute::Group(_)) => Err(schema_error(path, "not a scalar")),
        None => Err(schema_error(path, "no such attribute")),
    }
}

/// Sets the leaf at `path`, coercing `value` to the field's declared type.
///
/// Integer fields parse the string form of `value` and fail with
/// [`ConfigError::Coercion`] when it is not a number. Boolean fields are
/// true only for `"1"` or a case-insensitive `"true"`.
pub fn set(
    record: &mut dyn Attributes,
    path: &str,
    value: impl Into<Scalar>,
) -> Result<(), ConfigError> {
    let value = value.into();
    let (parents, leaf) = split_path(path)?;

    let mut group = record;
    for segment in parents {
        group = match group.attribute_mut(segment) {
            Some(AttributeMut::Group(next)) => next,
            Some(_) => return Err(schema_error(path, "not a group")),
            None => return Err(schema_error(path, "no such attribute")),
        };
    }

    match group.attribute_mut(leaf) {
        Some(AttributeMut::Text(field)) => *field = value.to_string(),
        Some(AttributeMut::Integer(field)) => *field = coerce_integer(path, value)?,
        Some(AttributeMut::Flag(field)) => *field = coerce_flag(value),
        Some(AttributeMut::Group(_)) => return Err(schema_error(path, "not a scalar")),
        None => return Err(schema_error(path, "no such attribute")),
    }

    Ok(())
}

fn split_path(path: &str) -> Result<(Vec<&str>, &str), ConfigError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(schema_error(path, "empty path segment"));
    }
    let leaf = segments.pop().ok_or_else(|| schema_error(path, "empty path"))?;
    Ok((segments, leaf))
}

fn coerce_integer(path: &str, value: Scalar) -> Result<i64, ConfigError> {
    match value {
        Scalar::Integer(i) => Ok(i),
        other => {
            let text = other.to_string();
            text.parse().map_err(|_| ConfigError::Coercion {
                path: path.to_string(),
                value: text,
            })
        }
    }
}

fn coerce_flag(value: Scalar) -> bool {
    match value {
        Scalar::Flag(b) => b,
        other => {
            let text = other.to_string();
            text == "1" || text.eq_ignore_ascii_case("true")
        }
    }
}

fn schema_error(path: &str, reason: &'static str) -> ConfigError {
    ConfigError::Schema {
        path: path.to_string(),
        reason,
    }
}

impl Attributes for DbConfig {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        Some(match name {
            "hostname" => Attribute::Text(&self.hostname),
            "username" => Attribute::Text(&self.username),
            "password" => Attribute::Text(&self.password),
            "db_name" => Attribute::Text(&self.db_name),
            _ => return None,
        })
    }

    fn attribute_mut(&mut self, name: &str) -> Option<AttributeMut<'_>> {
        Some(match name {
            "hostname" => AttributeMut::Text(&mut self.hostname),
            "username" => AttributeMut::Text(&mut self.username),
            "password" => AttributeMut::Text(&mut self.password),
            "db_name" => AttributeMut::Text(&mut self.db_name),
            _ => return None,
        })
    }
}

impl Attributes for LdapMappings {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        Some(match name {
            "dn" => Attribute::Text(&self.dn),
            "mail" => Attribute::Text(&self.mail),
            "uid" => Attribute::Text(&self.uid),
            "cn" => Attribute::Text(&self.cn),
            _ => return None,
        })
    }

    fn attribute_mut(&mut self, name: &str) -> Option<AttributeMut<'_>> {
        Some(match name {
            "dn" => AttributeMut::Text(&mut self.dn),
            "mail" => AttributeMut::Text(&mut self.mail),
            "uid" => AttributeMut::Text(&mut self.uid),
            "cn" => AttributeMut::Text(&mut self.cn),
            _ => return None,
        })
    }
}

// Both impls below must list the same names; `tests::test_views_agree`
// checks that.
impl Attributes for Config {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        use Attribute::{Flag, Group, Integer, Text};
        Some(match name {
            "mysql" => Group(&self.mysql),
            "bolt" => Group(&self.bolt),
            "postgres" => Group(&self.postgres),
            "dialect" => Text(&self.dialect),
            "port" => Text(&self.port),
            "interface" => Text(&self.interface),
            "tmp_path" => Text(&self.tmp_path),
            "ssh_config_path" => Text(&self.ssh_config_path),
            "git_client" => Text(&self.git_client),
            "web_host" => Text(&self.web_host),
            "cookie_hash" => Text(&self.cookie_hash),
            "cookie_encryption" => Text(&self.cookie_encryption),
            "access_key_encryption" => Text(&self.access_key_encryption),
            "email_alert" => Flag(self.email_alert),
            "email_sender" => Text(&self.email_sender),
            "email_host" => Text(&self.email_host),
            "email_port" => Text(&self.email_port),
            "email_username" => Text(&self.email_username),
            "email_password" => Text(&self.email_password),
            "email_secure" => Flag(self.email_secure),
            "ldap_enable" => Flag(self.ldap_enable),
            "ldap_bind_dn" => Text(&self.ldap_bind_dn),
            "ldap_bind_password" => Text(&self.ldap_bind_password),
            "ldap_server" => Text(&self.ldap_server),
            "ldap_search_dn" => Text(&self.ldap_search_dn),
            "ldap_search_filter" => Text(&self.ldap_search_filter),
            "ldap_mappings" => Group(&self.ldap_mappings),
            "ldap_need_tls" => Flag(self.ldap_need_tls),
            "telegram_alert" => Flag(self.telegram_alert),
            "telegram_chat" => Text(&self.telegram_chat),
            "telegram_token" => Text(&self.telegram_token),
            "slack_alert" => Flag(self.slack_alert),
            "slack_url" => Text(&self.slack_url),
            "max_parallel_tasks" => Integer(self.max_parallel_tasks),
            "demo_mode" => Flag(self.demo_mode),
            "password_login_disable" => Flag(self.password_login_disable),
            "non_admin_can_create_project" => Flag(self.non_admin_can_create_project),
            _ => return None,
        })
    }

    fn attribute_mut(&mut self, name: &str) -> Option<AttributeMut<'_>> {
        use AttributeMut::{Flag, Group, Integer, Text};
        Some(match name {
            "mysql" => Group(&mut self.mysql),
            "bolt" => Group(&mut self.bolt),
            "postgres" => Group(&mut self.postgres),
            "dialect" => Text(&mut self.dialect),
            "port" => Text(&mut self.port),
            "interface" => Text(&mut self.interface),
            "tmp_path" => Text(&mut self.tmp_path),
            "ssh_config_path" => Text(&mut self.ssh_config_path),
            "git_client" => Text(&mut self.git_client),
            "web_host" => Text(&mut self.web_host),
            "cookie_hash" => Text(&mut self.cookie_hash),
            "cookie_encryption" => Text(&mut self.cookie_encryption),
            "access_key_encryption" => Text(&mut self.access_key_encryption),
            "email_alert" => Flag(&mut self.email_alert),
            "email_sender" => Text(&mut self.email_sender),
            "email_host" => Text(&mut self.email_host),
            "email_port" => Text(&mut self.email_port),
            "email_username" => Text(&mut self.email_username),
            "email_password" => Text(&mut self.email_password),
            "email_secure" => Flag(&mut self.email_secure),
            "ldap_enable" => Flag(&mut self.ldap_enable),
            "ldap_bind_dn" => Text(&mut self.ldap_bind_dn),
            "ldap_bind_password" => Text(&mut self.ldap_bind_password),
            "ldap_server" => Text(&mut self.ldap_server),
            "ldap_search_dn" => Text(&mut self.ldap_search_dn),
            "ldap_search_filter" => Text(&mut self.ldap_search_filter),
            "ldap_mappings" => Group(&mut self.ldap_mappings),
            "ldap_need_tls" => Flag(&mut self.ldap_need_tls),
            "telegram_alert" => Flag(&mut self.telegram_alert),
            "telegram_chat" => Text(&mut self.telegram_chat),
            "telegram_token" => Text(&mut self.telegram_token),
            "slack_alert" => Flag(&mut self.slack_alert),
            "slack_url" => Text(&mut self.slack_url),
            "max_parallel_tasks" => Integer(&mut self.max_parallel_tasks),
            "demo_mode" => Flag(&mut self.demo_mode),
            "password_login_disable" => Flag(&mut self.password_login_disable),
            "non_admin_can_create_project" => Flag(&mut self.non_admin_can_create_project),
            _ => return None,
        })
    }
}
