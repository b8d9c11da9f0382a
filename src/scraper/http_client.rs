use crate::config::ScraperConfig;
use crate::scraper::PageFetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Rate limited (HTTP {0})")]
    Throttled(StatusCode),

    #[error("HTTP error {0}")]
    Status(StatusCode),

    #[error("Not an HTML page ({0})")]
    NotHtml(String),
}

impl FetchError {
    /// Transport failures and throttling are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Throttled(_))
    }
}

pub struct HttpClient {
    inner: reqwest::Client,
    config: ScraperConfig,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("Invalid Accept-Language header")?,
        );

        // Accept-Encoding is left to reqwest so gzip bodies still get decoded.
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner,
            config: config.clone(),
        })
    }

    /// Fetch a URL as text with rate-limiting and retry.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.polite_delay().await;

        let backoff = ExponentialBackoff::from_millis(2)
            .factor((self.config.request_delay_ms / 2).max(1))
            .map(jitter)
            .take(self.config.max_retries as usize);

        let mut attempt = 0u32;
        RetryIf::start(
            backoff,
            || {
                attempt += 1;
                debug!("GET {} (attempt {})", url, attempt);
                self.attempt(url)
            },
            |e: &FetchError| {
                let retry = e.is_retryable();
                if retry {
                    warn!("{} failed: {}, backing off", url, e);
                }
                retry
            },
        )
        .await
        .with_context(|| format!("All retries exhausted for {}", url))
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(FetchError::Throttled(status));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        if let Some(ct) = resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            if !ct.contains("html") {
                return Err(FetchError::NotHtml(ct.to_string()));
            }
        }

        Ok(resp.text().await?)
    }

    /// Sleep for the configured delay + random jitter.
    async fn polite_delay(&self) {
        let total = Duration::from_millis(self.config.request_delay_ms)
            + jitter(Duration::from_millis(self.config.jitter_ms));
        sleep(total).await;
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Throttled(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!FetchError::Status(StatusCode::NOT_FOUND).is_retryable());
        assert!(!FetchError::NotHtml("application/json".into()).is_retryable());
    }

    #[test]
    fn test_client_builds_from_defaults() {
        assert!(HttpClient::new(&ScraperConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_header_value() {
        let config = ScraperConfig {
            accept_language: "en\nUS".into(),
            ..ScraperConfig::default()
        };
        assert!(HttpClient::new(&config).is_err());
    }
}
