use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{OgemError, Result};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default retry budget handed to [`RetryPolicy`](crate::RetryPolicy)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings shared by the async and blocking clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    api_key: SecretString,
    /// Tenant sent as `X-Tenant-ID`
    pub tenant_id: Option<String>,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Retry budget for [`RetryPolicy`](crate::RetryPolicy)
    pub max_retries: u32,
    /// Log requests and response statuses at debug level
    pub debug: bool,
}

impl ClientConfig {
    /// Create a configuration for the given server and API key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either value is empty or the URL is
    /// not an absolute `http`/`https` URL
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(OgemError::Configuration("base_url is required".to_owned()));
        }

        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(OgemError::Configuration("api_key is required".to_owned()));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| OgemError::Configuration(format!("invalid base URL '{base_url}': {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(OgemError::Configuration(format!(
                "unsupported URL scheme '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            api_key: SecretString::from(api_key),
            tenant_id: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            debug: false,
        })
    }

    /// Build a configuration from `OGEM_*` environment variables
    ///
    /// Reads `OGEM_BASE_URL`, `OGEM_API_KEY`, and optionally `OGEM_TENANT_ID`,
    /// `OGEM_TIMEOUT` (e.g. `45s`), `OGEM_MAX_RETRIES` and `OGEM_DEBUG`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is missing or a
    /// value cannot be parsed
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("OGEM_BASE_URL").unwrap_or_default();
        let api_key = std::env::var("OGEM_API_KEY").unwrap_or_default();

        let mut config = Self::new(&base_url, api_key)?;

        if let Some(tenant_id) = non_empty_var("OGEM_TENANT_ID") {
            config.tenant_id = Some(tenant_id);
        }

        if let Some(timeout) = non_empty_var("OGEM_TIMEOUT") {
            config.timeout = duration_str::parse(&timeout)
                .map_err(|e| OgemError::Configuration(format!("invalid OGEM_TIMEOUT '{timeout}': {e}")))?;
        }

        if let Some(retries) = non_empty_var("OGEM_MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .map_err(|e| OgemError::Configuration(format!("invalid OGEM_MAX_RETRIES '{retries}': {e}")))?;
        }

        if let Some(debug) = non_empty_var("OGEM_DEBUG") {
            config.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Server base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Tenant to use for a tenant-scoped call
    pub(crate) fn resolve_tenant<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .filter(|id| !id.is_empty())
            .or_else(|| self.tenant_id.as_deref().filter(|id| !id.is_empty()))
    }

    /// Absolute URL for the given path segments below the base URL
    pub(crate) fn endpoint_url(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        url.path_segments_mut()
            .map_err(|()| OgemError::Configuration(format!("base URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
