use std::path::PathBuf;
use std::time::Duration;

use ogem_config::PricingConfig;

use crate::error::{PricingError, Result};
use crate::fetch::DEFAULT_USER_AGENT;

/// Resolved scraper settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Timeout for a single page fetch or browser run
    pub timeout: Duration,
    /// Random pause range before each HTTP fetch
    pub request_delay: (Duration, Duration),
    /// Pause between two providers
    pub provider_delay: Duration,
    /// User agent for both fetchers
    pub user_agent: String,
    /// Whether to try the headless browser at all
    pub browser_enabled: bool,
    /// Explicit browser executable
    pub browser_executable: Option<PathBuf>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            request_delay: (Duration::from_secs(2), Duration::from_secs(5)),
            provider_delay: Duration::from_secs(2),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            browser_enabled: true,
            browser_executable: None,
        }
    }
}

impl ScrapeSettings {
    /// Resolve settings from the `[pricing]` configuration section
    pub fn from_config(config: &PricingConfig) -> Result<Self> {
        let invalid = |e: anyhow::Error| PricingError::Config(format!("{e:#}"));

        let request_delay = config.request_delay().map_err(invalid)?;
        if request_delay.0 > request_delay.1 {
            return Err(PricingError::Config(format!(
                "request delay minimum ({:?}) exceeds maximum ({:?})",
                request_delay.0, request_delay.1
            )));
        }

        Ok(Self {
            timeout: config.timeout().map_err(invalid)?,
            request_delay,
            provider_delay: config.provider_delay().map_err(invalid)?,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            browser_enabled: config.browser.enabled,
            browser_executable: config.browser.executable.clone(),
        })
    }

    /// Settings with every pause removed
    pub fn without_delays(mut self) -> Self {
        self.request_delay = (Duration::ZERO, Duration::ZERO);
        self.provider_delay = Duration::ZERO;
        self
    }
}
