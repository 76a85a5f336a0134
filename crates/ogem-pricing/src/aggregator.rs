use std::time::Duration;

use indexmap::IndexMap;
use jiff::Timestamp;

use crate::error::Result;
use crate::provider::{DEFAULTS, ProviderScraper, WaterfallScraper};
use crate::settings::ScrapeSettings;
use crate::types::{PricingReport, ProviderReport};

/// Runs provider scrapers one after another and collects their results
pub struct Aggregator {
    scrapers: IndexMap<String, Box<dyn ProviderScraper>>,
    provider_delay: Duration,
}

impl Aggregator {
    /// Aggregator with the built-in providers
    pub fn new(settings: &ScrapeSettings) -> Result<Self> {
        let mut aggregator = Self::empty(settings.provider_delay);

        for profile in DEFAULTS {
            aggregator.register(WaterfallScraper::new(profile, settings)?);
        }

        Ok(aggregator)
    }

    /// Aggregator without any providers
    pub fn empty(provider_delay: Duration) -> Self {
        Self {
            scrapers: IndexMap::new(),
            provider_delay,
        }
    }

    /// Add or replace the scraper for its key
    pub fn register(&mut self, scraper: impl ProviderScraper + 'static) {
        self.scrapers.insert(scraper.key().to_owned(), Box::new(scraper));
    }

    /// Registered provider keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scrapers.keys().map(String::as_str)
    }

    /// Scrape the given providers in order
    ///
    /// Unknown keys are logged and left out of the report. A failing provider
    /// is recorded with its error and does not stop the run.
    pub async fn scrape_all<S: AsRef<str>>(&self, keys: &[S]) -> PricingReport {
        let mut report = PricingReport {
            scraped_at: Timestamp::now(),
            providers: IndexMap::new(),
        };

        let mut first = true;

        for key in keys {
            let key = key.as_ref();

            let Some(scraper) = self.scrapers.get(key) else {
                tracing::warn!(provider = key, "unknown provider");
                continue;
            };

            if !first && !self.provider_delay.is_zero() {
                tokio::time::sleep(self.provider_delay).await;
            }
            first = false;

            tracing::info!(provider = key, "scraping provider");

            let entry = match scraper.scrape().await {
                Ok(result) => {
                    tracing::info!(provider = key, models = result.models.len(), "found models");
                    ProviderReport::Priced(result)
                }
                Err(e) => {
                    tracing::error!(provider = key, error = %e, "scraping failed");
                    ProviderReport::Failed { error: e.to_string() }
                }
            };

            report.providers.insert(key.to_owned(), entry);
        }

        report
    }
}
