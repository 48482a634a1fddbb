//! HTTP client factory for calling other services.
//!
//! A [`ServiceClient`] is built from a [`ClientConfig`] and an ordered list
//! of [`ClientOption`]s. The configured timeout is applied first, then every
//! option in sequence, so later options win over earlier ones and over the
//! configuration. The resulting client is immutable and cheap to clone.

use crate::client_error::ClientError;
use crate::error::CommonResult;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Request timeout used when the configuration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Per-client configuration, usually read from a service's config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the remote service
    #[serde(default)]
    pub base: String,
    /// Request timeout; zero disables it
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
    /// Whether outgoing requests are logged
    #[serde(default)]
    pub enable_log: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base: String::new(),
            timeout: DEFAULT_TIMEOUT,
            enable_log: false,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given base URL.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
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
}

/// Connection-level settings handed to the HTTP stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: "mpay-clients-rust/1.0".to_string(),
        }
    }
}

impl TransportConfig {
    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set pool settings.
    #[must_use]
    pub const fn with_pool_config(mut self, idle_timeout: Duration, max_idle: usize) -> Self {
        self.pool_idle_timeout = idle_timeout;
        self.pool_max_idle_per_host = max_idle;
        self
    }
}

/// Everything that determines how the underlying HTTP client behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole-request timeout; `None` means no timeout
    pub timeout: Option<Duration>,
    /// Connection-level settings
    pub transport: TransportConfig,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            transport: TransportConfig::default(),
        }
    }
}

/// One step applied to [`HttpSettings`] while building a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOption {
    /// Replace the transport, keeping the timeout
    Transport(TransportConfig),
    /// Replace the settings wholesale
    Settings(HttpSettings),
    /// Replace the timeout, keeping the transport
    Timeout(Duration),
}

impl ClientOption {
    fn apply(self, settings: &mut HttpSettings) {
        match self {
            Self::Transport(transport) => settings.transport = transport,
            Self::Settings(replacement) => *settings = replacement,
            Self::Timeout(timeout) => settings.timeout = non_zero(timeout),
        }
    }
}

/// Override the transport.
#[must_use]
pub const fn with_transport(transport: TransportConfig) -> ClientOption {
    ClientOption::Transport(transport)
}

/// Replace the whole client description.
#[must_use]
pub const fn with_custom_client(settings: HttpSettings) -> ClientOption {
    ClientOption::Settings(settings)
}

/// Override the request timeout.
#[must_use]
pub const fn with_timeout(timeout: Duration) -> ClientOption {
    ClientOption::Timeout(timeout)
}

fn non_zero(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

/// Build a reqwest client from resolved settings.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, reqwest::Error> {
    let transport = &settings.transport;
    let mut builder = ClientBuilder::new()
        .connect_timeout(transport.connect_timeout)
        .pool_idle_timeout(transport.pool_idle_timeout)
        .pool_max_idle_per_host(transport.pool_max_idle_per_host)
        .user_agent(&transport.user_agent)
        .use_rustls_tls();

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Named HTTP client bound to a remote service's base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    name: String,
    base: String,
    log_enabled: bool,
    settings: HttpSettings,
    http: Client,
}

impl ServiceClient {
    /// Build a client from configuration and options.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::Http`](crate::CommonError::Http) if the
    /// underlying client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpay_common::http::{ClientConfig, ServiceClient, with_timeout};
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new("http://eds.local").with_timeout(Duration::from_secs(5));
    /// let client = ServiceClient::new(config, "eds", [with_timeout(Duration::from_secs(2))])
    ///     .expect("client");
    /// assert_eq!(client.timeout(), Some(Duration::from_secs(2)));
    /// ```
    pub fn new(
        config: ClientConfig,
        name: impl Into<String>,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> CommonResult<Self> {
        let mut settings = HttpSettings {
            timeout: non_zero(config.timeout),
            ..HttpSettings::default()
        };
        for option in options {
            option.apply(&mut settings);
        }

        let http = build_http_client(&settings)?;

        Ok(Self {
            name: name.into(),
            base: config.base,
            log_enabled: config.enable_log,
            settings,
            http,
        })
    }

    /// Client name, used in log events.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL as configured.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether outgoing requests are logged.
    #[must_use]
    pub const fn log_enabled(&self) -> bool {
        self.log_enabled
    }

    /// Settings the client was built with.
    #[must_use]
    pub const fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Effective request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.settings.timeout
    }

    /// Underlying reqwest client.
    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.http
    }

    /// Resolve `path` against the base URL.
    ///
    /// The base is treated as a directory, so `http://h/api` joined with
    /// `orders` yields `http://h/api/orders`.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::InvalidUrl`](crate::CommonError::InvalidUrl)
    /// if the base URL or the joined result cannot be parsed.
    pub fn endpoint(&self, path: &str) -> CommonResult<Url> {
        let mut base = Url::parse(&self.base)?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Start a request to `path` on the remote service.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint URL cannot be built.
    pub fn request(&self, method: Method, path: &str) -> CommonResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        if self.log_enabled {
            debug!(client = %self.name, %method, %url, "outgoing request");
        }
        Ok(self.http.request(method, url))
    }

    /// Read a failed response's body as a [`ClientError`].
    ///
    /// # Errors
    ///
    /// Fails when the body cannot be read or is not an error payload.
    pub async fn decode_error(&self, response: Response) -> CommonResult<ClientError> {
        let status = response.status();
        let body = response.bytes().await?;
        if self.log_enabled {
            debug!(client = %self.name, %status, bytes = body.len(), "decoding error response");
        }
        ClientError::from_slice(&body)
    }
}
