//! Built-in attribute tables driving the environment, defaults and
//! validation stages.

use super::path;
use super::types::Config;
use super::ConfigError;

/// Attribute path → environment variable. Applied in order.
///
/// Storage entries share variable names across dialects and are only
/// applied for the selected dialect, so `dialect` must come first.
pub const ENVIRONMENT_VARS: &[(&str, &str)] = &[
    ("dialect", "SEMAPHORE_DB_DIALECT"),
    ("mysql.hostname", "SEMAPHORE_DB_HOST"),
    ("mysql.username", "SEMAPHORE_DB_USER"),
    ("mysql.password", "SEMAPHORE_DB_PASS"),
    ("mysql.db_name", "SEMAPHORE_DB"),
    ("postgres.hostname", "SEMAPHORE_DB_HOST"),
    ("postgres.username", "SEMAPHORE_DB_USER"),
    ("postgres.password", "SEMAPHORE_DB_PASS"),
    ("postgres.db_name", "SEMAPHORE_DB"),
    ("bolt.hostname", "SEMAPHORE_DB_HOST"),
    ("port", "SEMAPHORE_PORT"),
    ("interface", "SEMAPHORE_INTERFACE"),
    ("tmp_path", "SEMAPHORE_TMP_PATH"),
    ("ssh_config_path", "SEMAPHORE_SSH_CONFIG_PATH"),
    ("git_client", "SEMAPHORE_GIT_CLIENT"),
    ("web_host", "SEMAPHORE_WEB_ROOT"),
    ("cookie_hash", "SEMAPHORE_COOKIE_HASH"),
    ("cookie_encryption", "SEMAPHORE_COOKIE_ENCRYPTION"),
    ("access_key_encryption", "SEMAPHORE_ACCESS_KEY_ENCRYPTION"),
    ("email_alert", "SEMAPHORE_EMAIL_ALERT"),
    ("email_sender", "SEMAPHORE_EMAIL_SENDER"),
    ("email_host", "SEMAPHORE_EMAIL_HOST"),
    ("email_port", "SEMAPHORE_EMAIL_PORT"),
    ("email_username", "SEMAPHORE_EMAIL_USER"),
    ("email_password", "SEMAPHORE_EMAIL_PASSWORD"),
    ("email_secure", "SEMAPHORE_EMAIL_SECURE"),
    ("ldap_enable", "SEMAPHORE_LDAP_ACTIVATED"),
    ("ldap_bind_dn", "SEMAPHORE_LDAP_DN_BIND"),
    ("ldap_bind_password", "SEMAPHORE_LDAP_PASSWORD"),
    ("ldap_server", "SEMAPHORE_LDAP_HOST"),
    ("ldap_search_dn", "SEMAPHORE_LDAP_DN_SEARCH"),
    ("ldap_search_filter", "SEMAPHORE_LDAP_SEARCH_FILTER"),
    ("ldap_mappings.dn", "SEMAPHORE_LDAP_MAPPING_DN"),
    ("ldap_mappings.uid", "SEMAPHORE_LDAP_MAPPING_USERNAME"),
    ("ldap_mappings.cn", "SEMAPHORE_LDAP_MAPPING_FULLNAME"),
    ("ldap_mappings.mail", "SEMAPHORE_LDAP_MAPPING_EMAIL"),
    ("ldap_need_tls", "SEMAPHORE_LDAP_NEEDTLS"),
    ("telegram_alert", "SEMAPHORE_TELEGRAM_ALERT"),
    ("telegram_chat", "SEMAPHORE_TELEGRAM_CHAT"),
    ("telegram_token", "SEMAPHORE_TELEGRAM_TOKEN"),
    ("slack_alert", "SEMAPHORE_SLACK_ALERT"),
    ("slack_url", "SEMAPHORE_SLACK_URL"),
    ("max_parallel_tasks", "SEMAPHORE_MAX_PARALLEL_TASKS"),
];

/// Attribute path → value used when the attribute is still empty.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("port", ":3000"),
    ("tmp_path", "/tmp/semaphore"),
    ("git_client", "go_git"),
];

/// Attribute path → pattern the resolved value must match in full.
pub const VALIDATION_RULES: &[(&str, &str)] = &[
    ("dialect", "^(|mysql|bolt|postgres)$"),
    // can have false negatives
    ("port", "^:[0-9]{1,5}$"),
    ("git_client", "^(go_git|cmd_git)$"),
    ("cookie_hash", "^[-A-Za-z0-9+=/]{40,}$"),
    ("cookie_encryption", "^[-A-Za-z0-9+=/]{40,}$"),
    ("access_key_encryption", "^[-A-Za-z0-9+=/]{40,}$"),
    ("email_port", "^(|[0-9]{1,5})$"),
    ("max_parallel_tasks", "^[0-9]{1,10}$"),
];

/// Checks that every path named in the built-in tables addresses a real
/// attribute of [`Config`].
pub fn verify_tables() -> Result<(), ConfigError> {
    let config = Config::default();
    ENVIRONMENT_VARS
        .iter()
        .chain(DEFAULTS)
        .chain(VALIDATION_RULES)
        .try_for_each(|(attribute, _)| path::get(&config, attribute).map(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_match_schema() {
        verify_tables().unwrap();
    }

    #[test]
    fn test_dialect_is_applied_before_storage_entries() {
        let dialect = ENVIRONMENT_VARS
            .iter()
            .position(|(path, _)| *path == "dialect")
            .unwrap();
        let first_storage = ENVIRONMENT_VARS
            .iter()
            .position(|(path, _)| path.contains('.') && !path.starts_with("ldap"))
            .unwrap();
        assert!(dialect < first_storage);
    }

    #[test]
    fn test_validation_patterns_compile() {
        for (attribute, pattern) in VALIDATION_RULES {
            assert!(regex::Regex::new(pattern).is_ok(), "{attribute}");
        }
    }
}
