use regex::Regex;

use super::path;
use super::schema::VALIDATION_RULES;
use super::types::Config;
use super::ConfigError;

/// Checks resolved attributes against regular expressions.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct Rule {
    attribute: &'static str,
    pattern: String,
    re: Regex,
}

impl Validator {
    /// Creates a validator from `(attribute path, pattern)` pairs.
    ///
    /// Patterns always match against the whole value, anchored or not.
    pub fn new(rules: &[(&'static str, &str)]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|(attribute, pattern)| {
                Regex::new(&format!("^(?:{pattern})$"))
                    .map(|re| Rule {
                        attribute: *attribute,
                        pattern: pattern.to_string(),
                        re,
                    })
                    .map_err(|_| ConfigError::Schema {
                        path: attribute.to_string(),
                        reason: "invalid validation pattern",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// A validator for the built-in [`VALIDATION_RULES`].
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(VALIDATION_RULES)
    }

    /// Normalizes the port, then reports every attribute that does not match
    /// its pattern through `report`.
    ///
    /// Values of secret-looking attributes are left out of the message.
    /// An `Err` means a rule names an attribute that does not exist.
    pub fn validate(
        &self,
        config: &mut Config,
        mut report: impl FnMut(String),
    ) -> Result<(), ConfigError> {
        normalize_port(config);

        for Rule {
            attribute,
            pattern,
            re,
        } in &self.rules
        {
            let value = path::get(&*config, attribute)?;
            if re.is_match(&value) {
                continue;
            }
            if is_secret(attribute) {
                report(format!(
                    "value of setting '{attribute}' is not valid! (Must match regex: '{pattern}')"
                ));
            } else {
                report(format!(
                    "value of setting '{attribute}' is not valid: '{value}' (Must match regex: '{pattern}')"
                ));
            }
        }

        Ok(())
    }
}

/// Prepends `:` to the port unless it is already there.
pub fn normalize_port(config: &mut Config) {
    if !config.port.starts_with(':') {
        config.port.insert(0, ':');
    }
}

/// Attribute names that hint at credentials.
pub fn is_secret(attribute: &str) -> bool {
    let lower = attribute.to_ascii_lowercase();
    lower.contains("assword") || lower.contains("ecret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "dGhpcyBpcyBhIHRlc3Qga2V5IHRoYXQgaXMgbG9uZyBlbm91Z2g=";

    fn valid_config() -> Config {
        Config {
            port: ":3000".into(),
            git_client: "go_git".into(),
            cookie_hash: KEY.into(),
            cookie_encryption: KEY.into(),
            access_key_encryption: KEY.into(),
            ..Config::default()
        }
    }

    fn collect(validator: &Validator, config: &mut Config) -> Vec<String> {
        let mut errors = Vec::new();
        validator.validate(config, |msg| errors.push(msg)).unwrap();
        errors
    }

    #[test]
    fn test_valid_config_passes() {
        let mut config = valid_config();
        assert!(collect(&Validator::builtin().unwrap(), &mut config).is_empty());
    }

    #[test]
    fn test_port_normalized_once() {
        let mut config = Config {
            port: "8080".into(),
            ..Config::default()
        };
        normalize_port(&mut config);
        assert_eq!(config.port, ":8080");
        normalize_port(&mut config);
        assert_eq!(config.port, ":8080");
    }

    #[test]
    fn test_port_without_separator_validates() {
        let mut config = valid_config();
        config.port = "3000".into();
        assert!(collect(&Validator::builtin().unwrap(), &mut config).is_empty());
        assert_eq!(config.port, ":3000");
    }

    #[test]
    fn test_reports_every_failure() {
        let mut config = valid_config();
        config.dialect = "sqlite".into();
        config.git_client = "svn".into();
        config.max_parallel_tasks = -1;

        let errors = collect(&Validator::builtin().unwrap(), &mut config);

        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("'dialect'") && e.contains("'sqlite'")));
        assert!(errors.iter().any(|e| e.contains("'git_client'") && e.contains("'svn'")));
        assert!(errors.iter().any(|e| e.contains("'max_parallel_tasks'") && e.contains("'-1'")));
    }

    #[test]
    fn test_patterns_match_whole_value() {
        let mut config = valid_config();
        config.dialect = "mysqlx".into();
        config.email_port = "25a".into();

        let errors = collect(&Validator::builtin().unwrap(), &mut config);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_unanchored_pattern_matches_whole_value() {
        let validator = Validator::new(&[("port", ":[0-9]{1,5}")]).unwrap();

        let mut config = Config {
            port: ":3000/evil".into(),
            ..Config::default()
        };
        let errors = collect(&validator, &mut config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("':[0-9]{1,5}'"));

        config.port = ":3000".into();
        assert!(collect(&validator, &mut config).is_empty());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let validator = Validator::new(&[("git_client", "go_git|cmd_git")]).unwrap();
        let mut config = Config {
            git_client: "go_git_extra".into(),
            ..Config::default()
        };
        assert_eq!(collect(&validator, &mut config).len(), 1);
    }

    #[test]
    fn test_secret_values_withheld() {
        let validator = Validator::new(&[
            ("email_password", "^.{12,}$"),
            ("ldap_bind_password", "^.{12,}$"),
        ])
        .unwrap();
        let mut config = Config {
            email_password: "hunter2".into(),
            ldap_bind_password: "letmein".into(),
            ..Config::default()
        };

        let errors = collect(&validator, &mut config);

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("email_password"));
        assert!(!errors[0].contains("hunter2"));
        assert!(!errors[1].contains("letmein"));
    }

    #[test]
    fn test_is_secret() {
        assert!(is_secret("email_password"));
        assert!(is_secret("ldap_bindPassword"));
        assert!(is_secret("client_SECRET"));
        assert!(!is_secret("cookie_hash"));
    }

    #[test]
    fn test_unknown_rule_path_is_schema_error() {
        let validator = Validator::new(&[("no_such_field", "^$")]).unwrap();
        let mut config = Config::default();
        let result = validator.validate(&mut config, |_| {});
        assert!(matches!(result, Err(ConfigError::Schema { .. })));
    }
}
