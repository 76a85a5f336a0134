use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Pricing scraper configuration
///
/// Durations are written as strings such as `"30s"` or `"500ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// HTTP request timeout
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Lower bound of the random pause before each page fetch
    #[serde(default = "default_request_delay_min")]
    pub request_delay_min: String,
    /// Upper bound of the random pause before each page fetch
    #[serde(default = "default_request_delay_max")]
    pub request_delay_max: String,
    /// Pause between two providers
    #[serde(default = "default_provider_delay")]
    pub provider_delay: String,
    /// User agent sent with page fetches
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Headless browser strategy
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            request_delay_min: default_request_delay_min(),
            request_delay_max: default_request_delay_max(),
            provider_delay: default_provider_delay(),
            user_agent: None,
            browser: BrowserConfig::default(),
        }
    }
}

impl PricingConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("pricing.timeout", &self.timeout)
    }

    /// Parsed `(min, max)` pause before each page fetch
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is invalid
    pub fn request_delay(&self) -> anyhow::Result<(Duration, Duration)> {
        Ok((
            parse_duration("pricing.request_delay_min", &self.request_delay_min)?,
            parse_duration("pricing.request_delay_max", &self.request_delay_max)?,
        ))
    }

    /// Parsed pause between providers
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is invalid
    pub fn provider_delay(&self) -> anyhow::Result<Duration> {
        parse_duration("pricing.provider_delay", &self.provider_delay)
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserConfig {
    /// Try the browser strategy at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Explicit browser executable; searched on `PATH` when unset
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            executable: None,
        }
    }
}

fn parse_duration(field: &str, value: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration for {field} '{value}': {e}"))
}

fn default_timeout() -> String {
    "30s".to_owned()
}

fn default_request_delay_min() -> String {
    "2s".to_owned()
}

fn default_request_delay_max() -> String {
    "5s".to_owned()
}

fn default_provider_delay() -> String {
    "2s".to_owned()
}

const fn default_true() -> bool {
    true
}
