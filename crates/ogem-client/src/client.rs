use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http;
use crate::resources::{Cache, Chat, ChatStream, Embeddings, Models, Monitoring, Tenants};
use crate::retry::RetryPolicy;
use crate::sse;
use crate::types::{CacheStats, ClearCacheResponse, HealthStatus, ServerStats, TenantUsage};

/// Async client for the Ogem proxy
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Create a client from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(http::USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a client from `OGEM_*` environment variables
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Tenant used for subsequent requests
    pub fn set_tenant_id(&mut self, tenant_id: impl Into<String>) {
        self.config.tenant_id = Some(tenant_id.into());
    }

    pub const fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Retry policy using the configured retry budget
    ///
    /// Requests are not retried automatically; wrap calls that should be:
    ///
    /// ```no_run
    /// # async fn demo(client: &ogem_client::Client) -> ogem_client::Result<()> {
    /// let models = client.retry_policy().run(|| client.models().list()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.config.max_retries,
            ..RetryPolicy::default()
        }
    }

    pub const fn chat(&self) -> Chat<'_> {
        Chat::new(self)
    }

    pub const fn embeddings(&self) -> Embeddings<'_> {
        Embeddings::new(self)
    }

    pub const fn models(&self) -> Models<'_> {
        Models::new(self)
    }

    pub const fn tenants(&self) -> Tenants<'_> {
        Tenants::new(self)
    }

    pub const fn cache(&self) -> Cache<'_> {
        Cache::new(self)
    }

    pub const fn monitoring(&self) -> Monitoring<'_> {
        Monitoring::new(self)
    }

    /// Server health; `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        self.execute(Endpoint::health()).await
    }

    /// Server statistics; `GET /stats`
    pub async fn stats(&self) -> Result<ServerStats> {
        self.execute(Endpoint::stats()).await
    }

    /// Global cache statistics; `GET /cache/stats`
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.execute(Endpoint::cache_stats(None)).await
    }

    /// Clear the whole cache; `POST /cache/clear`
    pub async fn clear_cache(&self) -> Result<ClearCacheResponse> {
        self.execute(Endpoint::cache_clear(None)).await
    }

    /// Usage of a tenant, defaulting to the configured one
    pub async fn tenant_usage(&self, tenant_id: Option<&str>) -> Result<TenantUsage> {
        self.execute(Endpoint::tenant(&self.config, tenant_id, "usage")?).await
    }

    /// Clear the cache of a tenant, defaulting to the configured one
    pub async fn clear_tenant_cache(&self, tenant_id: Option<&str>) -> Result<ClearCacheResponse> {
        self.execute(Endpoint::tenant_cache_clear(&self.config, tenant_id)?).await
    }

    pub(crate) async fn execute<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let response = self.send(&endpoint).await?;
        let bytes = response.bytes().await?;

        http::decode(&bytes)
    }

    pub(crate) async fn execute_text(&self, endpoint: Endpoint) -> Result<String> {
        Ok(self.send(&endpoint).await?.text().await?)
    }

    pub(crate) async fn open_stream(&self, endpoint: Endpoint) -> Result<ChatStream> {
        let response = self.send(&endpoint).await?;

        Ok(Box::pin(sse::chat_chunks(response.bytes_stream())))
    }

    async fn send(&self, endpoint: &Endpoint) -> Result<reqwest::Response> {
        let url = http::endpoint_url(&self.config, endpoint)?;
        http::log_request(&self.config, endpoint, &url);

        let mut request = self
            .http
            .request(endpoint.method.clone(), url)
            .headers(http::request_headers(&self.config, endpoint.stream)?);

        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        http::log_response(&self.config, endpoint, status.as_u16());

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await.unwrap_or_default();

        Err(http::error_for_status(status.as_u16(), retry_after.as_deref(), &text))
    }
}
