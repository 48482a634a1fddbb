//! EDS HTTP client.

use crate::config::EdsConfig;
use crate::error::EdsResult;
use mpay_common::ServiceClient;
use mpay_common::http::ClientOption;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Name used for the underlying service client.
pub const CLIENT_NAME: &str = "eds";

/// Operations service code depends on, so tests can substitute EDS.
pub trait EdsApi: Send + Sync {
    /// Host name presented to EDS.
    fn host(&self) -> &str;

    /// Start an authenticated request to `path`.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint URL cannot be built.
    fn authorized_request(&self, method: Method, path: &str) -> EdsResult<RequestBuilder>;
}

/// EDS client.
#[derive(Debug, Clone)]
pub struct EdsClient {
    client: ServiceClient,
    host: String,
    token: SecretString,
}

impl EdsClient {
    /// Create a new EDS client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: EdsConfig) -> EdsResult<Self> {
        Self::with_options(config, [])
    }

    /// Create a new EDS client with HTTP client options applied after the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// Same as [`EdsClient::new`].
    pub fn with_options(
        config: EdsConfig,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> EdsResult<Self> {
        config.validate()?;
        let client = ServiceClient::new(config.client_config(), CLIENT_NAME, options)?;

        debug!(base = %client.base(), host = %config.host, "EDS client created");

        Ok(Self {
            client,
            host: config.host,
            token: config.token,
        })
    }

    /// Underlying service client.
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }
}

impl EdsApi for EdsClient {
    fn host(&self) -> &str {
        &self.host
    }

    fn authorized_request(&self, method: Method, path: &str) -> EdsResult<RequestBuilder> {
        Ok(self
            .client
            .request(method, path)?
            .bearer_auth(self.token.expose_secret()))
    }
}
