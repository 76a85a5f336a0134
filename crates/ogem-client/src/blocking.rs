//! Blocking client with the same surface as [`Client`](crate::Client)
//!
//! Must not be used from within an async runtime.

use std::io::BufReader;

use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http;
use crate::retry::RetryPolicy;
use crate::sse::{self, DataLines};
use crate::types::{
    AdaptiveCacheState, CacheEntries, CacheEntriesQuery, CacheStats, CacheStatsReport, CacheStrategy, ChatCompletion,
    ChatCompletionChunk, ChatCompletionRequest, ClearCacheResponse, EmbeddingRequest, EmbeddingResponse, HealthStatus,
    Model, ModelList, ServerStats, StrategyUpdate, TenantUsage,
};

/// Blocking client for the Ogem proxy
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl Client {
    /// Create a client from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(http::USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_tenant_id(&mut self, tenant_id: impl Into<String>) {
        self.config.tenant_id = Some(tenant_id.into());
    }

    pub const fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Retry policy using the configured retry budget; see
    /// [`RetryPolicy::run_blocking`]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.config.max_retries,
            ..RetryPolicy::default()
        }
    }

    pub const fn chat(&self) -> Chat<'_> {
        Chat { client: self }
    }

    pub const fn embeddings(&self) -> Embeddings<'_> {
        Embeddings { client: self }
    }

    pub const fn models(&self) -> Models<'_> {
        Models { client: self }
    }

    pub const fn tenants(&self) -> Tenants<'_> {
        Tenants { client: self }
    }

    pub const fn cache(&self) -> Cache<'_> {
        Cache { client: self }
    }

    pub const fn monitoring(&self) -> Monitoring<'_> {
        Monitoring { client: self }
    }

    pub fn health(&self) -> Result<HealthStatus> {
        self.execute(&Endpoint::health())
    }

    pub fn stats(&self) -> Result<ServerStats> {
        self.execute(&Endpoint::stats())
    }

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.execute(&Endpoint::cache_stats(None))
    }

    pub fn clear_cache(&self) -> Result<ClearCacheResponse> {
        self.execute(&Endpoint::cache_clear(None))
    }

    pub fn tenant_usage(&self, tenant_id: Option<&str>) -> Result<TenantUsage> {
        self.execute(&Endpoint::tenant(&self.config, tenant_id, "usage")?)
    }

    pub fn clear_tenant_cache(&self, tenant_id: Option<&str>) -> Result<ClearCacheResponse> {
        self.execute(&Endpoint::tenant_cache_clear(&self.config, tenant_id)?)
    }

    fn execute<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let bytes = self.send(endpoint)?.bytes()?;
        http::decode(&bytes)
    }

    fn execute_text(&self, endpoint: &Endpoint) -> Result<String> {
        Ok(self.send(endpoint)?.text()?)
    }

    fn send(&self, endpoint: &Endpoint) -> Result<reqwest::blocking::Response> {
        let url = http::endpoint_url(&self.config, endpoint)?;
        http::log_request(&self.config, endpoint, &url);

        let mut request = self
            .http
            .request(endpoint.method.clone(), url)
            .headers(http::request_headers(&self.config, endpoint.stream)?);

        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        let response = request.send()?;
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
        let text = response.text().unwrap_or_default();

        Err(http::error_for_status(status.as_u16(), retry_after.as_deref(), &text))
    }
}

/// Chunks of a streamed completion; dropping it closes the connection
pub struct ChunkIter {
    lines: DataLines<BufReader<reqwest::blocking::Response>>,
}

impl Iterator for ChunkIter {
    type Item = Result<ChatCompletionChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(line.and_then(|data| sse::parse_chunk(&data)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Chat<'a> {
    client: &'a Client,
}

impl<'a> Chat<'a> {
    pub const fn completions(self) -> ChatCompletions<'a> {
        ChatCompletions { client: self.client }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChatCompletions<'a> {
    client: &'a Client,
}

impl ChatCompletions<'_> {
    /// Create a completion; `stream` is forced off
    pub fn create(self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        self.client.execute(&Endpoint::chat_completion(request, false)?)
    }

    /// Create a streamed completion; `stream` is forced on
    pub fn create_stream(self, request: &ChatCompletionRequest) -> Result<ChunkIter> {
        let response = self.client.send(&Endpoint::chat_completion(request, true)?)?;

        Ok(ChunkIter {
            lines: DataLines::new(BufReader::new(response)),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Embeddings<'a> {
    client: &'a Client,
}

impl Embeddings<'_> {
    pub fn create(self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.client.execute(&Endpoint::embeddings(request)?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    client: &'a Client,
}

impl Models<'_> {
    pub fn list(self) -> Result<ModelList> {
        self.client.execute(&Endpoint::models())
    }

    pub fn retrieve(self, model_id: &str) -> Result<Model> {
        self.client.execute(&Endpoint::model(model_id)?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tenants<'a> {
    client: &'a Client,
}

impl Tenants<'_> {
    pub fn usage(self, tenant_id: Option<&str>) -> Result<TenantUsage> {
        self.client.tenant_usage(tenant_id)
    }

    pub fn limits(self, tenant_id: Option<&str>) -> Result<Value> {
        self.client
            .execute(&Endpoint::tenant(&self.client.config, tenant_id, "limits")?)
    }

    pub fn settings(self, tenant_id: Option<&str>) -> Result<Value> {
        self.client
            .execute(&Endpoint::tenant(&self.client.config, tenant_id, "settings")?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cache<'a> {
    client: &'a Client,
}

impl Cache<'_> {
    pub fn stats(self, tenant_id: Option<&str>) -> Result<CacheStatsReport> {
        let endpoint = Endpoint::cache_stats(tenant_id);

        match tenant_id.filter(|id| !id.is_empty()) {
            Some(_) => self.client.execute(&endpoint).map(CacheStatsReport::Tenant),
            None => self.client.execute(&endpoint).map(CacheStatsReport::Global),
        }
    }

    pub fn clear(self, tenant_id: Option<&str>) -> Result<ClearCacheResponse> {
        self.client.execute(&Endpoint::cache_clear(tenant_id))
    }

    pub fn entries(self, query: &CacheEntriesQuery) -> Result<CacheEntries> {
        self.client.execute(&Endpoint::cache_entries(query))
    }

    pub fn analysis(self) -> Result<Value> {
        self.client.execute(&Endpoint::cache_analysis())
    }

    pub fn adaptive_state(self) -> Result<AdaptiveCacheState> {
        self.client.execute(&Endpoint::adaptive_state())
    }

    pub fn set_strategy(self, strategy: CacheStrategy, reason: Option<&str>) -> Result<StrategyUpdate> {
        self.client.execute(&Endpoint::set_strategy(strategy, reason))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Monitoring<'a> {
    client: &'a Client,
}

impl Monitoring<'_> {
    pub fn health(self) -> Result<HealthStatus> {
        self.client.health()
    }

    pub fn stats(self) -> Result<ServerStats> {
        self.client.stats()
    }

    /// Metrics decoded as JSON; see [`metrics_text`](Self::metrics_text)
    /// for Prometheus text
    pub fn metrics(self) -> Result<Value> {
        self.client.execute(&Endpoint::metrics())
    }

    /// Raw metrics body
    pub fn metrics_text(self) -> Result<String> {
        self.client.execute_text(&Endpoint::metrics())
    }
}
