//! EDS client configuration.

use crate::error::{EdsError, EdsResult};
use ::config::{Config, Environment, File, FileFormat};
use mpay_common::http::{ClientConfig, DEFAULT_TIMEOUT};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `EDS_TOKEN`.
pub const ENV_PREFIX: &str = "EDS";

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// EDS client configuration.
///
/// `base`, `timeout` and `enableLog` configure the HTTP client; `host` and
/// `token` identify this service to EDS.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdsConfig {
    /// EDS base URL
    pub base: String,
    /// Request timeout
    #[serde(
        default = "default_timeout",
        deserialize_with = "mpay_common::duration::deserialize"
    )]
    pub timeout: Duration,
    /// Whether outgoing requests are logged
    #[serde(default, alias = "enablelog")]
    pub enable_log: bool,
    /// Host name presented to EDS
    pub host: String,
    /// Access token
    #[serde(deserialize_with = "deserialize_token")]
    pub token: SecretString,
}

impl EdsConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(base: impl Into<String>, host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            timeout: DEFAULT_TIMEOUT,
            enable_log: false,
            host: host.into(),
            token: SecretString::from(token.into()),
        }
    }

    /// Load from a YAML file, then apply `EDS_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`EdsError::Config`] if the file cannot be read or parsed and
    /// [`EdsError::InvalidConfig`] if required values are empty.
    pub fn load(path: impl AsRef<Path>) -> EdsResult<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Self::finish(settings)
    }

    /// Parse from a YAML document without consulting the environment.
    ///
    /// # Errors
    ///
    /// Same as [`EdsConfig::load`].
    pub fn from_yaml_str(yaml: &str) -> EdsResult<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: Config) -> EdsResult<Self> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable request logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_log = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EdsError::InvalidConfig`] when `base` or `host` is empty.
    pub fn validate(&self) -> EdsResult<()> {
        if self.base.trim().is_empty() {
            return Err(EdsError::invalid_config("base must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(EdsError::invalid_config("host must not be empty"));
        }
        Ok(())
    }

    /// HTTP client settings derived from this config.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base.clone())
            .with_timeout(self.timeout)
            .with_logging(self.enable_log)
    }
}
