#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Model pricing scraper for Ogem
//!
//! Each provider is scraped with a waterfall of strategies: a headless
//! browser, a plain HTTP fetch, and finally a hardcoded price table that
//! always succeeds. The [`Aggregator`] runs providers one after another and
//! [`render`] turns the combined report into JSON, YAML, or a Go table literal.

mod aggregator;
pub mod error;
mod extract;
pub mod fetch;
mod html;
pub mod provider;
mod render;
mod settings;
mod strategy;
pub mod types;

pub use aggregator::Aggregator;
pub use error::{PricingError, Result};
pub use extract::extract_price;
pub use html::parse_pricing_table;
pub use provider::{ProviderProfile, ProviderScraper, WaterfallScraper};
pub use render::{OutputFormat, render};
pub use settings::ScrapeSettings;
pub use strategy::{Strategy, StrategyOutcome};
pub use types::{ModelPrice, PricingReport, PricingResult, ProviderReport};
