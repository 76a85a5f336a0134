//! Transport pieces shared by the async and blocking clients

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{ErrorBody, OgemError, Result};

/// `User-Agent` sent with every request
pub const USER_AGENT: &str = concat!("ogem-rust/", env!("CARGO_PKG_VERSION"));

const TENANT_HEADER: &str = "x-tenant-id";

/// Headers for one request
pub fn request_headers(config: &ClientConfig, stream: bool) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
        .map_err(|_| OgemError::Configuration("api_key contains invalid header characters".to_owned()))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(tenant_id) = config.tenant_id.as_deref().filter(|id| !id.is_empty()) {
        let value = HeaderValue::from_str(tenant_id).map_err(|_| {
            OgemError::Configuration(format!("tenant_id '{tenant_id}' contains invalid header characters"))
        })?;
        headers.insert(TENANT_HEADER, value);
    }

    if stream {
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }

    Ok(headers)
}

/// Absolute URL of an endpoint, query included
pub fn endpoint_url(config: &ClientConfig, endpoint: &Endpoint) -> Result<Url> {
    let mut url = config.endpoint_url(&endpoint.segments)?;

    if !endpoint.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(endpoint.query.iter().map(|(key, value)| (*key, value.as_str())));
    }

    Ok(url)
}

pub fn log_request(config: &ClientConfig, endpoint: &Endpoint, url: &Url) {
    if !config.debug {
        return;
    }

    match &endpoint.body {
        Some(body) => tracing::debug!(method = %endpoint.method, %url, %body, "sending request"),
        None => tracing::debug!(method = %endpoint.method, %url, "sending request"),
    }
}

pub fn log_response(config: &ClientConfig, endpoint: &Endpoint, status: u16) {
    if config.debug {
        tracing::debug!(path = %endpoint.path(), status, "received response");
    }
}

/// Map a failed response to the matching error
///
/// `retry_after` is the raw `Retry-After` header; the body field wins when
/// both are present.
pub fn error_for_status(status: u16, retry_after: Option<&str>, text: &str) -> OgemError {
    if status == 401 {
        return OgemError::Authentication {
            message: "Invalid API key".to_owned(),
        };
    }

    let body = ErrorBody::parse(status, text);
    let message = |default: &str| body.message().unwrap_or(default).to_owned();

    match status {
        403 if body.error_type().is_some_and(|t| t.to_lowercase().contains("tenant")) => OgemError::Tenant {
            message: message("Tenant access denied"),
            tenant_id: body.field("tenant_id").map(str::to_owned),
        },
        422 => OgemError::Validation {
            status: Some(status),
            message: message("Validation error"),
            field_errors: body.field_errors(),
        },
        429 => OgemError::RateLimit {
            message: message("Rate limit exceeded"),
            retry_after: body.retry_after().or_else(|| retry_after.and_then(parse_retry_after)),
            limit_type: body.field("limit_type").map(str::to_owned),
        },
        _ => {
            let default = if status == 403 {
                "Access denied".to_owned()
            } else {
                format!("HTTP {status}")
            };

            OgemError::Api {
                status: Some(status),
                error_type: body.error_type().map(str::to_owned),
                error_code: body.code(),
                message: message(&default),
                details: body.fields().clone(),
            }
        }
    }
}

/// `Retry-After` in delay-seconds form; HTTP dates are ignored
fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then(|| Duration::from_secs_f64(seconds))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| OgemError::Transport(format!("failed to parse response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:8080", "sk-test").unwrap()
    }

    #[test]
    fn default_headers() {
        let headers = request_headers(&config(), false).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(!headers.contains_key(TENANT_HEADER));
        assert!(!headers.contains_key(ACCEPT));
    }

    #[test]
    fn tenant_and_stream_headers() {
        let headers = request_headers(&config().with_tenant_id("acme"), true).unwrap();

        assert_eq!(headers["x-tenant-id"], "acme");
        assert_eq!(headers[ACCEPT], "text/event-stream");
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
    }

    #[test]
    fn invalid_tenant_header_is_a_configuration_error() {
        let err = request_headers(&config().with_tenant_id("bad\ntenant"), false).unwrap_err();
        assert!(matches!(err, OgemError::Configuration(_)));
    }

    #[test]
    fn query_is_appended() {
        let endpoint = Endpoint::cache_entries(&crate::types::CacheEntriesQuery::default().tenant_id("a b"));
        let url = endpoint_url(&config(), &endpoint).unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/cache/entries?limit=50&offset=0&tenant_id=a+b");
    }

    #[test]
    fn unauthorized_ignores_body() {
        let err = error_for_status(401, None, r#"{"error":{"message":"key revoked"}}"#);
        assert_eq!(
            err,
            OgemError::Authentication {
                message: "Invalid API key".to_owned()
            }
        );
    }

    #[test]
    fn forbidden_depends_on_error_type() {
        let err = error_for_status(403, None, r#"{"error":{"type":"tenant_suspended","tenant_id":"acme"}}"#);
        assert_eq!(
            err,
            OgemError::Tenant {
                message: "Tenant access denied".to_owned(),
                tenant_id: Some("acme".to_owned()),
            }
        );

        let err = error_for_status(403, None, r#"{"error":{"type":"forbidden"}}"#);
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.to_string(), "forbidden: [403] Access denied");
    }

    #[test]
    fn validation_keeps_field_errors() {
        let err = error_for_status(422, None, r#"{"message":"bad request","field_errors":{"n":"must be positive"}}"#);

        let OgemError::Validation {
            status,
            message,
            field_errors,
        } = err
        else {
            panic!("expected a validation error");
        };
        assert_eq!(status, Some(422));
        assert_eq!(message, "bad request");
        assert_eq!(field_errors["n"], "must be positive");
    }

    #[test]
    fn rate_limit_reads_body_then_header() {
        let err = error_for_status(429, Some("7"), r#"{"error":{"retry_after":3,"limit_type":"rpm"}}"#);
        assert_eq!(
            err,
            OgemError::RateLimit {
                message: "Rate limit exceeded".to_owned(),
                retry_after: Some(Duration::from_secs(3)),
                limit_type: Some("rpm".to_owned()),
            }
        );

        let err = error_for_status(429, Some("7"), "");
        assert!(matches!(err, OgemError::RateLimit { retry_after: Some(d), .. } if d == Duration::from_secs(7)));

        let err = error_for_status(429, Some("Wed, 21 Oct 2015 07:28:00 GMT"), "");
        assert!(matches!(err, OgemError::RateLimit { retry_after: None, .. }));
    }

    #[test]
    fn other_statuses_are_api_errors() {
        for status in [400, 404, 409, 500, 502, 503] {
            let err = error_for_status(status, None, "");
            assert!(matches!(err, OgemError::Api { .. }), "{status}");
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(err.to_string(), format!("[{status}] HTTP {status}"));
        }

        let err = error_for_status(500, None, r#"{"error":{"type":"internal","message":"boom","code":"e1"}}"#);
        assert_eq!(err.to_string(), "internal: [500] boom (code: e1)");
    }

    #[test]
    fn decode_failure_is_a_transport_error() {
        let err = decode::<crate::types::ModelList>(b"not json").unwrap_err();
        assert!(err.to_string().starts_with("request failed: failed to parse response"));
    }
}
