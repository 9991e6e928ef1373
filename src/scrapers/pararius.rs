use crate::error::FetchError;
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::SearchTarget;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pararius search page fetcher
pub struct ParariusScraper {
    client: Client,
    target: SearchTarget,
}

impl ParariusScraper {
    /// Create a scraper for the default Delft search
    pub fn new() -> Result<Self> {
        Self::with_target(SearchTarget::default())
    }

    /// Create a scraper for a custom search page
    pub fn with_target(target: SearchTarget) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, target })
    }

    pub fn target(&self) -> &SearchTarget {
        &self.target
    }
}

#[async_trait]
impl ScraperTrait for ParariusScraper {
    async fn fetch_page(&self) -> Result<String, FetchError> {
        let url = &self.target.url;
        info!("Fetching page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Search page returned an error status");
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|source| FetchError::Body {
            url: url.clone(),
            source,
        })?;

        debug!("Downloaded {} bytes of HTML", html.len());
        Ok(html)
    }

    fn source_name(&self) -> &'static str {
        "Pararius"
    }
}
