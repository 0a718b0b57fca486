//! The configuration record and its nested groups.
//!
//! Field names in JSON follow the persisted file format; the Rust field
//! names double as segments of the dotted attribute paths used by
//! [`get`](super::path::get) and [`set`](super::path::set).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connection settings for one storage backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    #[serde(rename = "host")]
    pub hostname: String,
    #[serde(rename = "user")]
    pub username: String,
    #[serde(rename = "pass")]
    pub password: String,
    #[serde(rename = "name")]
    pub db_name: String,
    /// Driver options appended to the connection descriptor as a query string.
    pub options: BTreeMap<String, String>,
}

/// LDAP attribute names used to build a user from a directory entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapMappings {
    pub dn: String,
    pub mail: String,
    pub uid: String,
    pub cn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcEndpoint {
    #[serde(rename = "issuer")]
    pub issuer_url: String,
    #[serde(rename = "auth")]
    pub auth_url: String,
    #[serde(rename = "token")]
    pub token_url: String,
    #[serde(rename = "userinfo")]
    pub user_info_url: String,
    #[serde(rename = "jwks")]
    pub jwks_url: String,
    pub algorithms: Vec<String>,
}

/// An OpenID Connect identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcProvider {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
    pub display_name: String,
    /// Issuer URL used for endpoint discovery; when empty `endpoint` is used.
    #[serde(rename = "provider_url")]
    pub auto_discovery: String,
    pub endpoint: OidcEndpoint,
    pub username_claim: String,
    pub name_claim: String,
    pub email_claim: String,
}

/// Server configuration, as persisted in `config.json`.
///
/// Missing keys decode to their zero value and are filled in later by the
/// environment and defaults stages of [`ConfigLoader`](super::ConfigLoader).
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mysql: DbConfig,
    pub bolt: DbConfig,
    pub postgres: DbConfig,

    /// Explicit storage backend. Empty means "infer from populated settings".
    pub dialect: String,

    /// Listen port in `:port_num` form, e.g. `:3000`. A missing `:` is
    /// corrected during validation.
    pub port: String,
    /// Interface address put in front of the port. Empty binds all.
    pub interface: String,

    /// Ephemeral project checkouts live here.
    pub tmp_path: String,
    /// Custom SSH client config. Empty means `~/.ssh/config`.
    pub ssh_config_path: String,
    /// `go_git` (built in) or `cmd_git` (external binary).
    pub git_client: String,

    /// Public URL of the web UI.
    pub web_host: String,

    pub cookie_hash: String,
    pub cookie_encryption: String,
    /// Base64 key used to encrypt access keys stored in the database.
    pub access_key_encryption: String,

    pub email_alert: bool,
    pub email_sender: String,
    pub email_host: String,
    pub email_port: String,
    pub email_username: String,
    pub email_password: String,
    pub email_secure: bool,

    pub ldap_enable: bool,
    #[serde(rename = "ldap_binddn")]
    pub ldap_bind_dn: String,
    #[serde(rename = "ldap_bindpassword")]
    pub ldap_bind_password: String,
    pub ldap_server: String,
    #[serde(rename = "ldap_searchdn")]
    pub ldap_search_dn: String,
    #[serde(rename = "ldap_searchfilter")]
    pub ldap_search_filter: String,
    pub ldap_mappings: LdapMappings,
    #[serde(rename = "ldap_needtls")]
    pub ldap_need_tls: bool,

    pub telegram_alert: bool,
    pub telegram_chat: String,
    pub telegram_token: String,
    pub slack_alert: bool,
    pub slack_url: String,

    pub oidc_providers: BTreeMap<String, OidcProvider>,

    pub max_parallel_tasks: i64,

    /// Deprecated.
    pub demo_mode: bool,
    pub password_login_disable: bool,
    pub non_admin_can_create_project: bool,
}

impl Config {
    /// Renders the record as tab-indented JSON, the inverse of the file decode.
    ///
    /// Every line after the first starts with a single space.
    pub fn to_json(&self) -> Result<String, super::ConfigError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)
            .map_err(super::ConfigError::Render)?;
        // serde_json only ever writes valid UTF-8, and escapes newlines in strings
        Ok(String::from_utf8_lossy(&out).replace('\n', "\n "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_ignored_and_missing_keys_zeroed() {
        let config: Config = serde_json::from_str(
            r#"{"port": ":8080", "no_such_setting": 1, "mysql": {"host": "db"}}"#,
        )
        .unwrap();

        assert_eq!(config.port, ":8080");
        assert_eq!(config.mysql.hostname, "db");
        assert_eq!(config.mysql.username, "");
        assert_eq!(config.max_parallel_tasks, 0);
        assert!(!config.email_alert);
    }

    #[test]
    fn test_render_round_trips_nested_groups() {
        let mut config = Config {
            dialect: "postgres".into(),
            ldap_need_tls: true,
            max_parallel_tasks: 4,
            ..Config::default()
        };
        config.postgres.hostname = "db:5432".into();
        config.postgres.options.insert("sslmode".into(), "disable".into());
        config.ldap_mappings.uid = "sAMAccountName".into();
        config.ldap_search_filter = "(&(uid=%s)\n(objectClass=person))".into();
        config.oidc_providers.insert(
            "github".into(),
            OidcProvider {
                client_id: "abc".into(),
                scopes: vec!["openid".into(), "email".into()],
                endpoint: OidcEndpoint {
                    issuer_url: "https://issuer".into(),
                    algorithms: vec!["RS256".into()],
                    ..OidcEndpoint::default()
                },
                ..OidcProvider::default()
            },
        );

        let rendered = config.to_json().unwrap();
        assert!(rendered.starts_with("{\n \t\"mysql\": {\n \t\t\"host\""));
        assert!(rendered.contains("\n \t\"ldap_needtls\": true"));
        assert!(rendered.ends_with("\n }"));
        assert!(rendered.contains("\"provider_url\""));

        let decoded: Config = serde_json::from_str(&rendered).unwrap();
        assert_eq!(decoded, config);
    }
}
