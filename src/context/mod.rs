//! Application context holding the resolved configuration and the values
//! derived from it.

use url::Url;

use crate::config::{Config, SecretKeys};
use crate::Error;

/// Central application context.
///
/// Built once at startup from a loaded [`Config`] and then shared by
/// reference (or inside an `Arc`) with every subsystem that needs it. The
/// record is never mutated afterwards.
///
/// ## Example
///
/// ```no_run
/// use semaphore_config::{AppContext, ConfigLoader};
///
/// let ctx = AppContext::builder()
///     .with_config(ConfigLoader::new().load()?)
///     .build()?;
///
/// let config = ctx.config();
/// let hash_key = &ctx.keys().cookie_hash;
/// # Ok::<(), semaphore_config::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext {
    config: Config,
    keys: SecretKeys,
    web_host: Option<Url>,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder { config: None }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decoded cookie and access-key secrets.
    pub fn keys(&self) -> &SecretKeys {
        &self.keys
    }

    /// Public URL of the web UI, if configured.
    pub fn web_host(&self) -> Option<&Url> {
        self.web_host.as_ref()
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    config: Option<Config>,
}

impl AppContextBuilder {
    /// Attaches a configuration to the application context.
    ///
    /// The configuration should be the result of
    /// [`ConfigLoader::load`](crate::ConfigLoader::load).
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the `AppContext`, decoding secrets and the web host URL.
    ///
    /// Returns an error if no configuration was provided.
    pub fn build(self) -> Result<AppContext, Error> {
        let config = self.config.ok_or(Error::MissingConfig)?;
        let keys = SecretKeys::from_config(&config)?;
        let web_host = if config.web_host.is_empty() {
            None
        } else {
            Some(Url::parse(&config.web_host).map_err(crate::ConfigError::from)?)
        };

        Ok(AppContext {
            config,
            keys,
            web_host,
        })
    }
}
