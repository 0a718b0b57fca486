//! Cookie and access-key secrets.

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::types::Config;
use super::ConfigError;

const KEY_LEN: usize = 32;

impl Config {
    /// Replaces the cookie and access-key secrets with fresh random keys.
    ///
    /// Used once at setup; the result is meant to be persisted.
    pub fn generate_secrets(&mut self) {
        self.cookie_hash = random_key();
        self.cookie_encryption = random_key();
        self.access_key_encryption = random_key();
    }
}

fn random_key() -> String {
    let mut bytes = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    Base64.encode(bytes)
}

/// Decoded key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKeys {
    pub cookie_hash: Vec<u8>,
    /// `None` disables cookie encryption.
    pub cookie_encryption: Option<Vec<u8>>,
    pub access_key_encryption: Option<Vec<u8>>,
}

impl std::fmt::Debug for SecretKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKeys")
            .field("cookie_hash", &"<redacted>")
            .field("cookie_encryption", &self.cookie_encryption.as_ref().map(|_| "<redacted>"))
            .field(
                "access_key_encryption",
                &self.access_key_encryption.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl SecretKeys {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            cookie_hash: decode_required("cookie_hash", &config.cookie_hash)?,
            cookie_encryption: decode_optional("cookie_encryption", &config.cookie_encryption)?,
            access_key_encryption: decode_optional(
                "access_key_encryption",
                &config.access_key_encryption,
            )?,
        })
    }
}

fn decode(field: &'static str, value: &str) -> Result<Vec<u8>, ConfigError> {
    Base64
        .decode(value)
        .map_err(|source| ConfigError::InvalidKey { field, source })
}

fn decode_required(field: &'static str, value: &str) -> Result<Vec<u8>, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingKey(field));
    }
    decode(field, value)
}

fn decode_optional(field: &'static str, value: &str) -> Result<Option<Vec<u8>>, ConfigError> {
    if value.is_empty() {
        return Ok(None);
    }
    decode(field, value).map(Some)
}
