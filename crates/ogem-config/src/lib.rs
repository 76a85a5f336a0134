#![allow(clippy::must_use_candidate)]

//! Configuration for the Ogem command-line tools
//!
//! Settings come from an optional TOML file. Values may reference environment
//! variables with `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`.

mod env;
mod loader;
pub mod log;
pub mod pricing;

use serde::Deserialize;

pub use log::{LogConfig, LogFormat};
pub use pricing::{BrowserConfig, PricingConfig};

/// Top-level tools configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Pricing scraper configuration
    #[serde(default)]
    pub pricing: PricingConfig,
}
