use indexmap::IndexMap;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Prices for one model, in USD per million tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    /// Price of prompt tokens
    pub input_price_per_1m: f64,
    /// Price of completion tokens
    pub output_price_per_1m: f64,
    /// Price of reasoning tokens, when billed separately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_price_per_1m: Option<f64>,
    /// Where the numbers came from (e.g. `openai_scraped`, `vertex_ai`)
    pub source: String,
}

/// Prices gathered for a single provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Provider name as published in the report
    pub provider: String,
    /// Pricing page that was targeted
    pub url: String,
    /// When the data was gathered
    pub scraped_at: Timestamp,
    /// Model identifier to prices, in discovery order
    pub models: IndexMap<String, ModelPrice>,
    /// Explains degraded data, e.g. fallback usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome for one provider slot in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderReport {
    /// Provider produced prices
    Priced(PricingResult),
    /// Provider failed entirely
    Failed {
        /// Failure description
        error: String,
    },
}

impl ProviderReport {
    /// Models for this slot, if any were produced
    pub const fn models(&self) -> Option<&IndexMap<String, ModelPrice>> {
        match self {
            Self::Priced(result) => Some(&result.models),
            Self::Failed { .. } => None,
        }
    }
}

/// Aggregated output of a scraping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReport {
    /// When the run started
    pub scraped_at: Timestamp,
    /// Provider key to outcome, in request order
    pub providers: IndexMap<String, ProviderReport>,
}
