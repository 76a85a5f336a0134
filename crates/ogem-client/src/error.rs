use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};

/// Client-specific result type
pub type Result<T> = std::result::Result<T, OgemError>;

/// Errors from the Ogem client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OgemError {
    /// Server returned an error that fits no narrower kind
    #[error("{}", describe(*status, error_type.as_deref(), error_code.as_deref(), message))]
    Api {
        /// HTTP status code
        status: Option<u16>,
        /// Error type reported by the server
        error_type: Option<String>,
        /// Error code reported by the server
        error_code: Option<String>,
        /// Human-readable error message
        message: String,
        /// Remaining fields of the error body
        details: Map<String, Value>,
    },

    /// API key missing, invalid or expired
    #[error("authentication failed: {message}")]
    Authentication {
        /// Human-readable error message
        message: String,
    },

    /// A request, token or cost limit was exceeded
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        /// Human-readable error message
        message: String,
        /// How long the server asked us to wait
        retry_after: Option<Duration>,
        /// Which limit was hit, e.g. `requests_per_minute`
        limit_type: Option<String>,
    },

    /// Tenant unknown, suspended or not accessible with this key
    #[error("tenant error: {message}")]
    Tenant {
        /// Human-readable error message
        message: String,
        /// Tenant the error refers to
        tenant_id: Option<String>,
    },

    /// Request failed validation, locally or on the server
    #[error("validation error: {message}")]
    Validation {
        /// HTTP status code; `None` for errors raised before any request
        status: Option<u16>,
        /// Human-readable error message
        message: String,
        /// Per-field error details
        field_errors: Map<String, Value>,
    },

    /// Requested model is unknown or unavailable
    #[error("model error: {message}")]
    Model {
        /// HTTP status code
        status: Option<u16>,
        /// Human-readable error message
        message: String,
        /// Model the error refers to
        model_id: Option<String>,
    },

    /// Upstream provider failed
    #[error("provider error: {message}")]
    Provider {
        /// HTTP status code
        status: Option<u16>,
        /// Human-readable error message
        message: String,
        /// Provider the error refers to
        provider: Option<String>,
    },

    /// Cache operation failed
    #[error("cache error: {0}")]
    Cache(String),

    /// Streaming response was interrupted or malformed
    #[error("stream error: {0}")]
    Stream(String),

    /// Request did not complete within the timeout
    #[error("timeout: {0}")]
    Timeout(String),

    /// Could not reach the server
    #[error("connection failed: {0}")]
    Connection(String),

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any other transport failure
    #[error("request failed: {0}")]
    Transport(String),
}

fn describe(status: Option<u16>, error_type: Option<&str>, error_code: Option<&str>, message: &str) -> String {
    let mut text = match status {
        Some(status) => format!("[{status}] {message}"),
        None => message.to_owned(),
    };

    if let Some(error_type) = error_type {
        text = format!("{error_type}: {text}");
    }

    if let Some(code) = error_code {
        text = format!("{text} (code: {code})");
    }

    text
}

/// Closed set of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Api,
    Authentication,
    RateLimit,
    Tenant,
    Validation,
    Model,
    Provider,
    Cache,
    Stream,
    Timeout,
    Connection,
    Configuration,
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Api => "api_error",
            Self::Authentication => "authentication_error",
            Self::RateLimit => "rate_limit_error",
            Self::Tenant => "tenant_error",
            Self::Validation => "validation_error",
            Self::Model => "model_error",
            Self::Provider => "provider_error",
            Self::Cache => "cache_error",
            Self::Stream => "stream_error",
            Self::Timeout => "timeout_error",
            Self::Connection => "connection_error",
            Self::Configuration => "configuration_error",
            Self::Transport => "transport_error",
        };

        f.write_str(name)
    }
}

/// Pick the most specific error kind for a server error
///
/// Keywords in the error type (and "rate limit" in the message) win over the
/// status code table. Unknown combinations map to [`ErrorKind::Api`].
pub fn classify(status: u16, error_type: &str, message: &str) -> ErrorKind {
    let error_type = error_type.to_lowercase();

    if error_type.contains("authentication") {
        ErrorKind::Authentication
    } else if error_type.contains("rate_limit") || message.to_lowercase().contains("rate limit") {
        ErrorKind::RateLimit
    } else if error_type.contains("tenant") {
        ErrorKind::Tenant
    } else if error_type.contains("validation") {
        ErrorKind::Validation
    } else if error_type.contains("model") {
        ErrorKind::Model
    } else if error_type.contains("provider") {
        ErrorKind::Provider
    } else {
        match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Tenant,
            404 => ErrorKind::Model,
            429 => ErrorKind::RateLimit,
            500 | 502 | 503 => ErrorKind::Provider,
            504 => ErrorKind::Timeout,
            _ => ErrorKind::Api,
        }
    }
}

/// Decoded error payload of a failed response
///
/// The `{"error": {...}}` envelope is unwrapped when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    fields: Map<String, Value>,
}

impl ErrorBody {
    /// Parse a response body; never fails
    ///
    /// Bodies that are not JSON objects become `{"message": <text>}`, or
    /// `HTTP <status>` when the text is empty.
    pub fn parse(status: u16, text: &str) -> Self {
        let fields = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(mut object)) => match object.remove("error") {
                Some(Value::Object(inner)) => inner,
                Some(other) => {
                    object.insert("error".to_owned(), other);
                    object
                }
                None => object,
            },
            _ => {
                let message = if text.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    text.to_owned()
                };
                Map::from_iter([("message".to_owned(), Value::String(message))])
            }
        };

        Self { fields }
    }

    /// Build a body from already decoded fields
    pub const fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// String field, if present and non-empty
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }

    pub fn error_type(&self) -> Option<&str> {
        self.field("type")
    }

    /// Error code; numeric codes are rendered as text
    pub fn code(&self) -> Option<String> {
        match self.fields.get("code")? {
            Value::String(code) if !code.is_empty() => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            _ => None,
        }
    }

    /// `retry_after` field in seconds, numeric or textual
    pub fn retry_after(&self) -> Option<Duration> {
        let seconds = match self.fields.get("retry_after")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };

        (seconds.is_finite() && seconds >= 0.0).then(|| Duration::from_secs_f64(seconds))
    }

    pub fn field_errors(&self) -> Map<String, Value> {
        match self.fields.get("field_errors") {
            Some(Value::Object(errors)) => errors.clone(),
            _ => Map::new(),
        }
    }

    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl OgemError {
    /// Build the most specific error for a server error body
    ///
    /// The kind is chosen by [`classify`].
    pub fn from_error_body(status: u16, body: &ErrorBody) -> Self {
        let message = body.message().unwrap_or("API request failed").to_owned();
        let error_type = body.error_type().unwrap_or("unknown_error");

        match classify(status, error_type, &message) {
            ErrorKind::Authentication => Self::Authentication { message },
            ErrorKind::RateLimit => Self::RateLimit {
                message,
                retry_after: body.retry_after(),
                limit_type: body.field("limit_type").map(str::to_owned),
            },
            ErrorKind::Tenant => Self::Tenant {
                message,
                tenant_id: body.field("tenant_id").map(str::to_owned),
            },
            ErrorKind::Validation => Self::Validation {
                status: Some(status),
                message,
                field_errors: body.field_errors(),
            },
            ErrorKind::Model => Self::Model {
                status: Some(status),
                message,
                model_id: body.field("model_id").map(str::to_owned),
            },
            ErrorKind::Provider => Self::Provider {
                status: Some(status),
                message,
                provider: body.field("provider").map(str::to_owned),
            },
            ErrorKind::Timeout => Self::Timeout(message),
            _ => Self::Api {
                status: Some(status),
                error_type: Some(error_type.to_owned()),
                error_code: body.code(),
                message,
                details: body.fields().clone(),
            },
        }
    }

    /// Local validation failure, raised before any request is sent
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            status: None,
            message: message.into(),
            field_errors: Map::new(),
        }
    }

    /// HTTP status associated with this error, if any
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. }
            | Self::Validation { status, .. }
            | Self::Model { status, .. }
            | Self::Provider { status, .. } => *status,
            Self::Authentication { .. } => Some(401),
            Self::RateLimit { .. } => Some(429),
            Self::Tenant { .. } => Some(403),
            _ => None,
        }
    }

    /// Error type identifier
    ///
    /// Server-reported for [`OgemError::Api`], fixed for the other API kinds.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Api { error_type, .. } => error_type.as_deref(),
            Self::Authentication { .. } => Some("authentication_error"),
            Self::RateLimit { .. } => Some("rate_limit_error"),
            Self::Tenant { .. } => Some("tenant_error"),
            Self::Validation { .. } => Some("validation_error"),
            Self::Model { .. } => Some("model_error"),
            Self::Provider { .. } => Some("provider_error"),
            _ => None,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::Api,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Tenant { .. } => ErrorKind::Tenant,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Model { .. } => ErrorKind::Model,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Cache(_) => ErrorKind::Cache,
            Self::Stream(_) => ErrorKind::Stream,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl From<reqwest::Error> for OgemError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout("Request timed out".to_owned())
        } else if error.is_connect() {
            Self::Connection(format!("Failed to connect to Ogem server: {error}"))
        } else {
            Self::Transport(error.to_string())
        }
    }
}
