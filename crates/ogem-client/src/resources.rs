//! Endpoint groups of the async client

use std::pin::Pin;

use futures::Stream;
use serde_json::Value;

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::types::{
    AdaptiveCacheState, CacheEntries, CacheEntriesQuery, CacheStatsReport, CacheStrategy, ChatCompletion,
    ChatCompletionChunk, ChatCompletionRequest, ClearCacheResponse, EmbeddingRequest, EmbeddingResponse, HealthStatus,
    Model, ModelList, ServerStats, StrategyUpdate, TenantUsage,
};

/// Stream of chat completion chunks; dropping it closes the connection
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk>> + Send>>;

/// Chat endpoints
#[derive(Debug, Clone, Copy)]
pub struct Chat<'a> {
    client: &'a Client,
}

impl<'a> Chat<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub const fn completions(self) -> ChatCompletions<'a> {
        ChatCompletions { client: self.client }
    }
}

/// `/v1/chat/completions`
#[derive(Debug, Clone, Copy)]
pub struct ChatCompletions<'a> {
    client: &'a Client,
}

impl ChatCompletions<'_> {
    /// Create a completion; `stream` is forced off
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending anything if the model or
    /// messages are empty
    pub async fn create(self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        self.client.execute(Endpoint::chat_completion(request, false)?).await
    }

    /// Create a streamed completion; `stream` is forced on
    ///
    /// Each item is one parsed chunk. The stream ends at the `[DONE]` marker.
    pub async fn create_stream(self, request: &ChatCompletionRequest) -> Result<ChatStream> {
        self.client.open_stream(Endpoint::chat_completion(request, true)?).await
    }
}

/// `/v1/embeddings`
#[derive(Debug, Clone, Copy)]
pub struct Embeddings<'a> {
    client: &'a Client,
}

impl<'a> Embeddings<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create(self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.client.execute(Endpoint::embeddings(request)?).await
    }
}

/// `/v1/models`
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    client: &'a Client,
}

impl<'a> Models<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(self) -> Result<ModelList> {
        self.client.execute(Endpoint::models()).await
    }

    pub async fn retrieve(self, model_id: &str) -> Result<Model> {
        self.client.execute(Endpoint::model(model_id)?).await
    }
}

/// `/tenants/{id}/...`
///
/// Every method falls back to the client's tenant when none is given.
#[derive(Debug, Clone, Copy)]
pub struct Tenants<'a> {
    client: &'a Client,
}

impl<'a> Tenants<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn usage(self, tenant_id: Option<&str>) -> Result<TenantUsage> {
        self.client.tenant_usage(tenant_id).await
    }

    pub async fn limits(self, tenant_id: Option<&str>) -> Result<Value> {
        let endpoint = Endpoint::tenant(self.client.config(), tenant_id, "limits")?;
        self.client.execute(endpoint).await
    }

    pub async fn settings(self, tenant_id: Option<&str>) -> Result<Value> {
        let endpoint = Endpoint::tenant(self.client.config(), tenant_id, "settings")?;
        self.client.execute(endpoint).await
    }
}

/// `/cache/...`
#[derive(Debug, Clone, Copy)]
pub struct Cache<'a> {
    client: &'a Client,
}

impl<'a> Cache<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Global statistics, or those of one tenant
    pub async fn stats(self, tenant_id: Option<&str>) -> Result<CacheStatsReport> {
        let endpoint = Endpoint::cache_stats(tenant_id);

        match tenant_id.filter(|id| !id.is_empty()) {
            Some(_) => self.client.execute(endpoint).await.map(CacheStatsReport::Tenant),
            None => self.client.execute(endpoint).await.map(CacheStatsReport::Global),
        }
    }

    /// Clear everything, or only one tenant's entries
    pub async fn clear(self, tenant_id: Option<&str>) -> Result<ClearCacheResponse> {
        self.client.execute(Endpoint::cache_clear(tenant_id)).await
    }

    pub async fn entries(self, query: &CacheEntriesQuery) -> Result<CacheEntries> {
        self.client.execute(Endpoint::cache_entries(query)).await
    }

    pub async fn analysis(self) -> Result<Value> {
        self.client.execute(Endpoint::cache_analysis()).await
    }

    pub async fn adaptive_state(self) -> Result<AdaptiveCacheState> {
        self.client.execute(Endpoint::adaptive_state()).await
    }

    pub async fn set_strategy(self, strategy: CacheStrategy, reason: Option<&str>) -> Result<StrategyUpdate> {
        self.client.execute(Endpoint::set_strategy(strategy, reason)).await
    }
}

/// Health and statistics endpoints
#[derive(Debug, Clone, Copy)]
pub struct Monitoring<'a> {
    client: &'a Client,
}

impl<'a> Monitoring<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn health(self) -> Result<HealthStatus> {
        self.client.health().await
    }

    pub async fn stats(self) -> Result<ServerStats> {
        self.client.stats().await
    }

    /// Metrics decoded as JSON
    ///
    /// Fails with a parse error against servers that expose Prometheus text on
    /// `/metrics`; use [`metrics_text`](Self::metrics_text) there.
    pub async fn metrics(self) -> Result<Value> {
        self.client.execute(Endpoint::metrics()).await
    }

    /// Raw metrics body, e.g. the Prometheus exposition format
    pub async fn metrics_text(self) -> Result<String> {
        self.client.execute_text(Endpoint::metrics()).await
    }
}
