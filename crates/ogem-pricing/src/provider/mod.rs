//! Provider scrapers

mod profiles;

use async_trait::async_trait;
use indexmap::IndexMap;
use jiff::Timestamp;

pub use profiles::{ANTHROPIC, AZURE, DEFAULTS, GOOGLE, OPENAI};

use crate::error::Result;
use crate::fetch::{BrowserFetcher, HttpFetcher};
use crate::html::parse_pricing_table;
use crate::settings::ScrapeSettings;
use crate::strategy::{Strategy, StrategyOutcome};
use crate::types::{ModelPrice, PricingResult};

/// Trait for per-provider price scrapers
#[async_trait]
pub trait ProviderScraper: Send + Sync {
    /// Key used to select this provider, e.g. `openai`
    fn key(&self) -> &str;

    /// Gather the provider's prices
    ///
    /// An error, typically [`PricingError::Scrape`](crate::PricingError::Scrape),
    /// is recorded in the report under this scraper's key without stopping the
    /// other providers.
    async fn scrape(&self) -> Result<PricingResult>;
}

/// One entry of a built-in price table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackPrice {
    pub model: &'static str,
    pub input: f64,
    pub output: f64,
    pub reasoning: Option<f64>,
}

/// Static description of a provider's pricing page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderProfile {
    /// Selection key
    pub key: &'static str,
    /// Provider name written to the report
    pub provider: &'static str,
    /// Public pricing page
    pub url: &'static str,
    /// Substrings identifying this provider's models in a pricing table
    pub keywords: &'static [&'static str],
    /// Source tag of built-in prices
    pub fallback_source: &'static str,
    /// Built-in price table
    pub fallback: &'static [FallbackPrice],
}

impl ProviderProfile {
    /// Look up a built-in profile by key
    pub fn find(key: &str) -> Option<&'static Self> {
        DEFAULTS.into_iter().find(|profile| profile.key == key)
    }

    /// Source tag of prices parsed from the live page
    pub fn scraped_source(&self) -> String {
        format!("{}_scraped", self.key)
    }

    /// The built-in price table as report entries
    pub fn fallback_models(&self) -> IndexMap<String, ModelPrice> {
        self.fallback
            .iter()
            .map(|entry| {
                let price = ModelPrice {
                    input_price_per_1m: entry.input,
                    output_price_per_1m: entry.output,
                    reasoning_price_per_1m: entry.reasoning,
                    source: self.fallback_source.to_owned(),
                };
                (entry.model.to_owned(), price)
            })
            .collect()
    }
}

/// Scraper that walks the browser, HTTP and fallback strategies in turn
#[derive(Debug, Clone)]
pub struct WaterfallScraper {
    profile: &'static ProviderProfile,
    url: String,
    http: HttpFetcher,
    browser: Option<BrowserFetcher>,
}

impl WaterfallScraper {
    pub fn new(profile: &'static ProviderProfile, settings: &ScrapeSettings) -> Result<Self> {
        let http = HttpFetcher::new(settings.timeout, &settings.user_agent, settings.request_delay)?;

        let browser = if settings.browser_enabled {
            BrowserFetcher::locate(
                settings.browser_executable.as_deref(),
                &settings.user_agent,
                settings.timeout,
            )
        } else {
            None
        };

        Ok(Self {
            profile,
            url: profile.url.to_owned(),
            http,
            browser,
        })
    }

    /// Scrape a different page than the profile's, e.g. a mirror
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Disable the browser strategy
    #[must_use]
    pub fn without_browser(mut self) -> Self {
        self.browser = None;
        self
    }

    pub const fn profile(&self) -> &'static ProviderProfile {
        self.profile
    }

    async fn attempt(&self, strategy: Strategy) -> StrategyOutcome {
        let page = match strategy {
            Strategy::Browser => {
                let Some(browser) = &self.browser else {
                    return StrategyOutcome::Skipped("no headless browser available".to_owned());
                };
                tracing::debug!(browser = %browser.executable().display(), url = %self.url, "rendering page");
                browser.fetch(&self.url).await
            }
            Strategy::Http => self.http.fetch(&self.url).await,
            Strategy::Fallback => return StrategyOutcome::Found(self.profile.fallback_models()),
        };

        match page {
            Ok(html) => StrategyOutcome::from_parsed(parse_pricing_table(
                &html,
                self.profile.keywords,
                &self.profile.scraped_source(),
            )),
            Err(reason) => StrategyOutcome::Failed(reason),
        }
    }

    fn result(&self, models: IndexMap<String, ModelPrice>, note: Option<String>) -> PricingResult {
        PricingResult {
            provider: self.profile.provider.to_owned(),
            url: self.url.clone(),
            scraped_at: Timestamp::now(),
            models,
            note,
        }
    }
}

#[async_trait]
impl ProviderScraper for WaterfallScraper {
    fn key(&self) -> &str {
        self.profile.key
    }

    async fn scrape(&self) -> Result<PricingResult> {
        let mut last_error = None;

        for strategy in Strategy::WATERFALL {
            match self.attempt(strategy).await {
                StrategyOutcome::Found(models) => {
                    tracing::info!(provider = self.profile.key, %strategy, models = models.len(), "pricing found");

                    let note = (strategy == Strategy::Fallback).then(|| {
                        let reason = last_error.take().unwrap_or_else(|| "no scraping method available".to_owned());
                        format!("All scraping methods failed, using fallback data. Last error: {reason}")
                    });

                    return Ok(self.result(models, note));
                }
                StrategyOutcome::Skipped(reason) => {
                    tracing::debug!(provider = self.profile.key, %strategy, %reason, "strategy skipped");
                }
                StrategyOutcome::Failed(reason) => {
                    tracing::warn!(provider = self.profile.key, %strategy, %reason, "strategy failed");
                    last_error = Some(reason);
                }
            }
        }

        // Fallback always produces models.
        Ok(self.result(self.profile.fallback_models(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scraper(profile: &'static ProviderProfile, url: String) -> WaterfallScraper {
        let settings = ScrapeSettings {
            browser_enabled: false,
            ..ScrapeSettings::default()
        }
        .without_delays();

        WaterfallScraper::new(profile, &settings).unwrap().with_url(url)
    }

    #[test]
    fn profiles_are_found_by_key() {
        assert_eq!(ProviderProfile::find("google").unwrap().provider, "google_cloud");
        assert!(ProviderProfile::find("cohere").is_none());
    }

    #[test]
    fn fallback_tables_are_tagged() {
        let models = OPENAI.fallback_models();
        assert_eq!(models.len(), 7);
        assert!(models.values().all(|m| m.source == "openai_fallback"));
        assert_eq!(models.get_index(0).map(|(k, _)| k.as_str()), Some("gpt-4o"));
    }

    #[test]
    fn only_gemini_two_five_has_reasoning_prices() {
        let models = GOOGLE.fallback_models();
        assert_eq!(models["gemini-2.5-pro"].reasoning_price_per_1m, Some(10.0));
        assert_eq!(models["gemini-1.5-pro"].reasoning_price_per_1m, None);
    }

    #[tokio::test]
    async fn blocked_page_falls_back_with_note() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pricing"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let result = scraper(&OPENAI, format!("{}/pricing", server.uri()))
            .scrape()
            .await
            .unwrap();

        assert_eq!(result.provider, "openai");
        assert_eq!(result.models, OPENAI.fallback_models());
        let note = result.note.unwrap();
        assert!(note.starts_with("All scraping methods failed, using fallback data. Last error: "));
        assert!(note.contains("403"));
    }

    #[tokio::test]
    async fn page_without_prices_falls_back() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Enable JavaScript</body></html>"))
            .mount(&server)
            .await;

        let result = scraper(&ANTHROPIC, server.uri()).scrape().await.unwrap();

        assert!(result.models.values().all(|m| m.source == "anthropic_api"));
        assert!(result.note.unwrap().contains("no pricing rows found"));
    }

    #[tokio::test]
    async fn parsed_page_wins_over_fallback() {
        let server = MockServer::start().await;

        let html = r"
            <table>
              <tr><th>Model</th><th>Input</th><th>Output</th></tr>
              <tr><td>gpt-4o</td><td>$2.00 / 1M</td><td>$8.00 / 1M</td></tr>
            </table>
        ";

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let result = scraper(&OPENAI, server.uri()).scrape().await.unwrap();

        assert_eq!(result.note, None);
        assert_eq!(result.models.len(), 1);
        assert_eq!(result.models["gpt-4o"].source, "openai_scraped");
        assert_eq!(result.url, server.uri());
    }
}
