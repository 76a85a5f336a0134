/// Pricing result type
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors from scraping or rendering prices
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// HTTP client could not be built or a request failed outright
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid scraper settings
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Requested output format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// JSON serialization failed
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A provider scraper failed without producing data
    ///
    /// The built-in waterfall scrapers always fall back to their price table;
    /// this is what custom [`ProviderScraper`](crate::ProviderScraper)
    /// implementations return, and the aggregator records it per provider.
    #[error("scraper failed: {0}")]
    Scrape(String),
}
