//! Page fetchers used by the scraping strategies

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use crate::error::{PricingError, Result};

/// Desktop Chrome user agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Executables probed on `PATH` for the browser strategy
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Plain HTTP fetcher that looks like a desktop browser
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    delay: (Duration, Duration),
}

impl HttpFetcher {
    /// Build a fetcher with the given timeout, user agent and pre-request delay range
    pub fn new(timeout: Duration, user_agent: &str, delay: (Duration, Duration)) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers(user_agent)?)
            .build()?;

        Ok(Self { client, delay })
    }

    /// Fetch a page body after a random pause
    ///
    /// Non-success statuses are reported as errors with the status line.
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, String> {
        let pause = random_delay(self.delay);
        if !pause.is_zero() {
            tracing::debug!(?pause, url, "waiting before fetch");
            tokio::time::sleep(pause).await;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        response.text().await.map_err(|e| format!("failed to read body: {e}"))
    }
}

/// Headers mimicking a navigation in desktop Chrome
fn browser_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).map_err(|e| PricingError::Config(format!("invalid user agent: {e}")))?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    let navigation = [
        ("dnt", "1"),
        ("upgrade-insecure-requests", "1"),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
        ("sec-ch-ua", "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"macOS\""),
    ];

    for (name, value) in navigation {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    Ok(headers)
}

/// Uniformly random pause within `[min, max]`
fn random_delay((min, max): (Duration, Duration)) -> Duration {
    if max <= min {
        return min;
    }

    rand::rng().random_range(min..=max)
}

/// Headless Chrome/Chromium run with `--dump-dom`
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    executable: PathBuf,
    user_agent: String,
    timeout: Duration,
}

impl BrowserFetcher {
    /// Locate a browser, preferring an explicit executable
    ///
    /// Returns `None` when no browser is installed.
    pub fn locate(explicit: Option<&Path>, user_agent: &str, timeout: Duration) -> Option<Self> {
        let executable = match explicit {
            Some(path) => path.is_file().then(|| path.to_path_buf()),
            None => find_on_path(BROWSER_CANDIDATES),
        }?;

        Some(Self {
            executable,
            user_agent: user_agent.to_owned(),
            timeout,
        })
    }

    /// Path of the browser executable
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Render a page and return its serialized DOM
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, String> {
        let mut command = tokio::process::Command::new(&self.executable);
        command
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--window-size=1920,1080")
            .arg(format!("--user-agent={}", self.user_agent))
            .arg("--virtual-time-budget=5000")
            .arg("--dump-dom")
            .arg(url)
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| format!("browser timed out after {:?}", self.timeout))?
            .map_err(|e| format!("failed to launch {}: {e}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("browser exited with {}: {}", output.status, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// First candidate found as a file in any `PATH` directory
fn find_on_path(candidates: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;

    std::env::split_paths(&path).find_map(|dir| {
        candidates
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
