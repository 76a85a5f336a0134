//! Request and response records

mod message;
mod operations;
mod request;
mod response;

pub use message::{Content, ContentPart, FunctionCall, FunctionDefinition, ImageUrl, Message, ResponseFormat, Role, Tool, ToolCall};
pub use operations::{
    AdaptiveCacheState, CacheEntries, CacheEntriesQuery, CacheEntryInfo, CacheStats, CacheStatsReport, CacheStrategy,
    ClearCacheResponse, HealthStatus, Pagination, PerformanceStats, RequestStats, ServerStats, StrategyChange,
    StrategyUpdate, TenantCacheStats, TenantCacheStatsResponse, TenantUsage,
};
pub use request::{ChatCompletionRequest, EmbeddingInput, EmbeddingRequest};
pub use response::{
    ChatCompletion, ChatCompletionChunk, Choice, ChoiceDelta, Delta, Embedding, EmbeddingResponse, FunctionCallDelta,
    Model, ModelList, ToolCallDelta, Usage,
};
