//! Records returned by the proxy's operational endpoints
//!
//! The server adds fields over time, so every record tolerates unknown
//! fields and defaults missing ones.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OgemError;

/// Response of `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub timestamp: String,
    /// Per-dependency health, shape defined by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}

/// Response of `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerStats {
    pub requests: RequestStats,
    pub performance: PerformanceStats,
    pub providers: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenants: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestStats {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceStats {
    /// Human-readable latency such as `120ms`
    pub average_latency: String,
    pub throughput_rpm: f64,
    pub error_rate: f64,
}

/// Cache counters, globally or for one tenant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_entries: u64,
    pub memory_usage_mb: f64,
    pub hit_rate: f64,
    /// Average lookup latency in nanoseconds
    #[serde(rename = "average_latency")]
    pub average_latency_nanos: u64,
    pub exact_hits: u64,
    pub semantic_hits: u64,
    pub token_hits: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tenant_stats: BTreeMap<String, TenantCacheStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Timestamp>,
}

impl CacheStats {
    pub const fn average_latency(&self) -> Duration {
        Duration::from_nanos(self.average_latency_nanos)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
    pub memory_mb: f64,
}

/// Response of `GET /cache/stats/tenant/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantCacheStatsResponse {
    pub tenant_id: String,
    pub stats: TenantCacheStats,
}

/// Cache statistics, shaped by whether a tenant was requested
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatsReport {
    Global(CacheStats),
    Tenant(TenantCacheStatsResponse),
}

impl CacheStatsReport {
    pub const fn hit_rate(&self) -> f64 {
        match self {
            Self::Global(stats) => stats.hit_rate,
            Self::Tenant(response) => response.stats.hit_rate,
        }
    }
}

/// Response of `POST /cache/clear[/tenant/{id}]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearCacheResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

/// Filter and page of a cache entry listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntriesQuery {
    pub tenant_id: Option<String>,
    pub model: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for CacheEntriesQuery {
    fn default() -> Self {
        Self {
            tenant_id: None,
            model: None,
            limit: 50,
            offset: 0,
        }
    }
}

impl CacheEntriesQuery {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Response of `GET /cache/entries`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheEntries {
    pub entries: Vec<CacheEntryInfo>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheEntryInfo {
    pub key: String,
    pub hash: String,
    pub model: String,
    pub created_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub access_count: u64,
    pub last_access: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub compressed: bool,
    /// Size in bytes
    pub size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
}

/// Caching strategy of the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    None,
    Exact,
    Semantic,
    Token,
    Hybrid,
    Adaptive,
}

impl CacheStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Exact => "exact",
            Self::Semantic => "semantic",
            Self::Token => "token",
            Self::Hybrid => "hybrid",
            Self::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheStrategy {
    type Err = OgemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "exact" => Ok(Self::Exact),
            "semantic" => Ok(Self::Semantic),
            "token" => Ok(Self::Token),
            "hybrid" => Ok(Self::Hybrid),
            "adaptive" => Ok(Self::Adaptive),
            other => Err(OgemError::invalid(format!("unknown cache strategy '{other}'"))),
        }
    }
}

/// Response of `GET /cache/adaptive/state`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveCacheState {
    /// Strategy name as reported; see [`strategy`](Self::strategy)
    pub current_strategy: String,
    pub last_evaluation: Option<Timestamp>,
    pub sample_count: u64,
    pub strategy_history: Vec<StrategyChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_detection: Option<Value>,
}

impl AdaptiveCacheState {
    /// Current strategy, if it is one this client knows
    pub fn strategy(&self) -> Option<CacheStrategy> {
        self.current_strategy.parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyChange {
    pub timestamp: Option<Timestamp>,
    pub from_strategy: String,
    pub to_strategy: String,
    pub reason: String,
    pub hit_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
}

/// Response of `POST /cache/adaptive/strategy`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyUpdate {
    pub message: String,
    pub old_strategy: String,
    pub new_strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: Option<Timestamp>,
}

/// Response of `GET /tenants/{id}/usage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub requests_this_hour: u64,
    pub requests_this_day: u64,
    pub requests_this_month: u64,
    pub tokens_this_hour: u64,
    pub tokens_this_day: u64,
    pub tokens_this_month: u64,
    pub cost_this_hour: f64,
    pub cost_this_day: f64,
    pub cost_this_month: f64,
    pub storage_used_gb: f64,
    pub files_count: u64,
    pub active_users: u64,
    pub teams_count: u64,
    pub projects_count: u64,
    pub last_updated: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cache_stats_parse_with_tenants() {
        let stats: CacheStats = serde_json::from_value(json!({
            "hits": 90,
            "misses": 10,
            "total_entries": 42,
            "memory_usage_mb": 12.5,
            "hit_rate": 0.9,
            "average_latency": 1_500_000,
            "exact_hits": 80,
            "semantic_hits": 8,
            "token_hits": 2,
            "tenant_stats": {"acme": {"hits": 5, "misses": 1, "hit_rate": 0.83, "entries": 3, "memory_mb": 0.1}},
            "last_updated": "2025-01-15T10:30:00.123456+09:00"
        }))
        .unwrap();

        assert_eq!(stats.average_latency(), Duration::from_micros(1500));
        assert_eq!(stats.tenant_stats["acme"].entries, 3);
        assert!(stats.last_updated.is_some());
    }

    #[test]
    fn entries_parse_with_pagination() {
        let entries: CacheEntries = serde_json::from_value(json!({
            "entries": [{
                "key": "k1",
                "hash": "abc",
                "model": "gpt-4o",
                "created_at": "2025-01-15T10:30:00Z",
                "expires_at": "2025-01-15T11:30:00Z",
                "access_count": 3,
                "last_access": "2025-01-15T10:45:00Z",
                "compressed": true,
                "size": 2048
            }],
            "pagination": {"limit": 50, "offset": 0, "count": 1}
        }))
        .unwrap();

        assert_eq!(entries.entries[0].size, 2048);
        assert_eq!(entries.entries[0].tenant_id, None);
        assert_eq!(entries.pagination.count, 1);
        assert_eq!(entries.pagination.total, None);
    }

    #[test]
    fn adaptive_state_exposes_known_strategy() {
        let state: AdaptiveCacheState = serde_json::from_value(json!({
            "current_strategy": "semantic",
            "last_evaluation": "2025-01-15T10:30:00Z",
            "sample_count": 1000,
            "strategy_history": [{
                "timestamp": "2025-01-15T10:00:00Z",
                "from_strategy": "exact",
                "to_strategy": "semantic",
                "reason": "manual_override",
                "hit_rate": 0.5,
                "metrics": null
            }]
        }))
        .unwrap();

        assert_eq!(state.strategy(), Some(CacheStrategy::Semantic));
        assert_eq!(state.strategy_history[0].from_strategy, "exact");

        let unknown = AdaptiveCacheState {
            current_strategy: "quantum".to_owned(),
            ..AdaptiveCacheState::default()
        };
        assert_eq!(unknown.strategy(), None);
    }

    #[test]
    fn strategies_parse_and_print() {
        for strategy in [
            CacheStrategy::None,
            CacheStrategy::Exact,
            CacheStrategy::Semantic,
            CacheStrategy::Token,
            CacheStrategy::Hybrid,
            CacheStrategy::Adaptive,
        ] {
            assert_eq!(strategy.to_string().parse::<CacheStrategy>().unwrap(), strategy);
            assert_eq!(serde_json::to_value(strategy).unwrap(), json!(strategy.as_str()));
        }

        assert_eq!(" Hybrid ".parse::<CacheStrategy>().unwrap(), CacheStrategy::Hybrid);
        assert!("lru".parse::<CacheStrategy>().is_err());
    }

    #[test]
    fn entries_query_defaults() {
        let query = CacheEntriesQuery::default();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);

        let query = query.model("gpt-4o").offset(100);
        assert_eq!(query.model.as_deref(), Some("gpt-4o"));
        assert_eq!(query.offset, 100);
    }

    #[test]
    fn tenant_usage_and_health_tolerate_missing_fields() {
        let usage: TenantUsage = serde_json::from_value(json!({"requests_this_day": 12, "cost_this_day": 0.42})).unwrap();
        assert_eq!(usage.requests_this_day, 12);
        assert_eq!(usage.tenant_id, None);

        let health: HealthStatus = serde_json::from_value(json!({"status": "healthy", "version": "1.2.0"})).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.uptime, "");
    }
}
