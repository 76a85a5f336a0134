use reqwest::Method;
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::{OgemError, Result};
use crate::types::{CacheEntriesQuery, CacheStrategy, ChatCompletionRequest, EmbeddingRequest};

/// A fully validated call, shared by the async and blocking clients
///
/// Constructors run the local argument checks, so a value of this type is
/// always safe to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    pub stream: bool,
}

impl Endpoint {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            query: Vec::new(),
            body: None,
            stream: false,
        }
    }

    fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `POST /v1/chat/completions` with `stream` forced to the given mode
    pub fn chat_completion(request: &ChatCompletionRequest, stream: bool) -> Result<Self> {
        if request.model.is_empty() {
            return Err(OgemError::invalid("model is required"));
        }
        if request.messages.is_empty() {
            return Err(OgemError::invalid("messages is required"));
        }

        let mut body = request.build();
        body.insert("stream".to_owned(), Value::Bool(stream));

        let mut endpoint = Self::post(&["v1", "chat", "completions"]).with_body(Value::Object(body));
        endpoint.stream = stream;

        Ok(endpoint)
    }

    pub fn embeddings(request: &EmbeddingRequest) -> Result<Self> {
        if request.model.is_empty() {
            return Err(OgemError::invalid("model is required"));
        }
        if request.input.is_empty() {
            return Err(OgemError::invalid("input is required"));
        }

        Ok(Self::post(&["v1", "embeddings"]).with_body(Value::Object(request.build())))
    }

    pub fn models() -> Self {
        Self::get(&["v1", "models"])
    }

    pub fn model(model_id: &str) -> Result<Self> {
        if model_id.is_empty() {
            return Err(OgemError::invalid("model_id is required"));
        }

        Ok(Self::get(&["v1", "models", model_id]))
    }

    /// `GET /tenants/{id}/<resource>`, falling back to the configured tenant
    pub fn tenant(config: &ClientConfig, tenant_id: Option<&str>, resource: &str) -> Result<Self> {
        let tenant_id = config
            .resolve_tenant(tenant_id)
            .ok_or_else(|| OgemError::invalid("tenant_id is required"))?;

        Ok(Self::get(&["tenants", tenant_id, resource]))
    }

    pub fn cache_stats(tenant_id: Option<&str>) -> Self {
        match tenant_id.filter(|id| !id.is_empty()) {
            Some(tenant_id) => Self::get(&["cache", "stats", "tenant", tenant_id]),
            None => Self::get(&["cache", "stats"]),
        }
    }

    pub fn cache_clear(tenant_id: Option<&str>) -> Self {
        match tenant_id.filter(|id| !id.is_empty()) {
            Some(tenant_id) => Self::post(&["cache", "clear", "tenant", tenant_id]),
            None => Self::post(&["cache", "clear"]),
        }
    }

    /// `POST /cache/clear/tenant/{id}`, falling back to the configured tenant
    pub fn tenant_cache_clear(config: &ClientConfig, tenant_id: Option<&str>) -> Result<Self> {
        let tenant_id = config
            .resolve_tenant(tenant_id)
            .ok_or_else(|| OgemError::invalid("tenant_id is required"))?;

        Ok(Self::cache_clear(Some(tenant_id)))
    }

    pub fn cache_entries(query: &CacheEntriesQuery) -> Self {
        let mut endpoint = Self::get(&["cache", "entries"]);
        endpoint.query = vec![("limit", query.limit.to_string()), ("offset", query.offset.to_string())];

        if let Some(tenant_id) = query.tenant_id.as_deref().filter(|id| !id.is_empty()) {
            endpoint.query.push(("tenant_id", tenant_id.to_owned()));
        }
        if let Some(model) = query.model.as_deref().filter(|m| !m.is_empty()) {
            endpoint.query.push(("model", model.to_owned()));
        }

        endpoint
    }

    pub fn cache_analysis() -> Self {
        Self::get(&["cache", "analysis"])
    }

    pub fn adaptive_state() -> Self {
        Self::get(&["cache", "adaptive", "state"])
    }

    pub fn set_strategy(strategy: CacheStrategy, reason: Option<&str>) -> Self {
        let mut body = json!({ "strategy": strategy });
        if let Some(reason) = reason.filter(|r| !r.is_empty()) {
            body["reason"] = Value::from(reason);
        }

        Self::post(&["cache", "adaptive", "strategy"]).with_body(body)
    }

    pub fn health() -> Self {
        Self::get(&["health"])
    }

    pub fn stats() -> Self {
        Self::get(&["stats"])
    }

    pub fn metrics() -> Self {
        Self::get(&["metrics"])
    }

    /// Path relative to the base URL, for logging
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmbeddingInput, Message};

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:8080", "key").unwrap()
    }

    #[test]
    fn chat_requires_model_and_messages() {
        let err = Endpoint::chat_completion(&ChatCompletionRequest::new("", vec![Message::user("hi")]), false).unwrap_err();
        assert_eq!(err, OgemError::invalid("model is required"));

        let err = Endpoint::chat_completion(&ChatCompletionRequest::new("m", vec![]), false).unwrap_err();
        assert_eq!(err, OgemError::invalid("messages is required"));
    }

    #[test]
    fn chat_forces_stream_mode() {
        let request = ChatCompletionRequest::new("m", vec![Message::user("hi")]).stream(true);

        let endpoint = Endpoint::chat_completion(&request, false).unwrap();
        assert_eq!(endpoint.body.unwrap()["stream"], false);
        assert!(!endpoint.stream);

        let endpoint = Endpoint::chat_completion(&request, true).unwrap();
        assert_eq!(endpoint.path(), "/v1/chat/completions");
        assert!(endpoint.stream);
    }

    #[test]
    fn embeddings_require_input() {
        let err = Endpoint::embeddings(&EmbeddingRequest::new("e", EmbeddingInput::Texts(vec![]))).unwrap_err();
        assert_eq!(err, OgemError::invalid("input is required"));
    }

    #[test]
    fn tenant_endpoints_fall_back_to_configured_tenant() {
        let err = Endpoint::tenant(&config(), None, "usage").unwrap_err();
        assert_eq!(err, OgemError::invalid("tenant_id is required"));

        let configured = config().with_tenant_id("acme");
        assert_eq!(Endpoint::tenant(&configured, None, "limits").unwrap().path(), "/tenants/acme/limits");
        assert_eq!(
            Endpoint::tenant(&configured, Some("other"), "settings").unwrap().path(),
            "/tenants/other/settings"
        );
        assert_eq!(
            Endpoint::tenant_cache_clear(&configured, None).unwrap().path(),
            "/cache/clear/tenant/acme"
        );
    }

    #[test]
    fn cache_paths() {
        assert_eq!(Endpoint::cache_stats(None).path(), "/cache/stats");
        assert_eq!(Endpoint::cache_stats(Some("acme")).path(), "/cache/stats/tenant/acme");
        assert_eq!(Endpoint::cache_clear(Some("")).path(), "/cache/clear");
        assert_eq!(Endpoint::cache_clear(None).method, Method::POST);
    }

    #[test]
    fn entries_query_skips_unset_filters() {
        let endpoint = Endpoint::cache_entries(&CacheEntriesQuery::default().model("gpt-4o"));

        assert_eq!(
            endpoint.query,
            vec![
                ("limit", "50".to_owned()),
                ("offset", "0".to_owned()),
                ("model", "gpt-4o".to_owned()),
            ]
        );
    }

    #[test]
    fn strategy_body_omits_empty_reason() {
        let endpoint = Endpoint::set_strategy(CacheStrategy::Semantic, Some(""));
        assert_eq!(endpoint.body.unwrap(), json!({"strategy": "semantic"}));

        let endpoint = Endpoint::set_strategy(CacheStrategy::Hybrid, Some("load test"));
        assert_eq!(endpoint.body.unwrap(), json!({"strategy": "hybrid", "reason": "load test"}));
    }
}
