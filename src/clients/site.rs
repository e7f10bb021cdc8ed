use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::constants::scrape::FIRST_PAGE;
use crate::scrape::ScrapeError;

/// Builds the search endpoint for `term`. The term is inserted verbatim;
/// callers normalise it before it gets here.
#[must_use]
pub fn search_url(base_url: &str, term: &str, page: Option<u32>) -> String {
    format!(
        "{base_url}/search?q={term}&page={}",
        page.unwrap_or(FIRST_PAGE)
    )
}

/// Source of raw page bodies.
///
/// The production implementation is [`HttpFetcher`]; tests substitute an
/// in-memory site.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` exactly as given.
    async fn get(&self, url: &str) -> Result<String, ScrapeError>;

    /// Fetches a search results page when `term` is given, otherwise `url`
    /// itself.
    async fn fetch(
        &self,
        url: &str,
        term: Option<&str>,
        page: Option<u32>,
    ) -> Result<String, ScrapeError> {
        match term {
            Some(term) => self.get(&search_url(url, term, page)).await,
            None => self.get(url).await,
        }
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client from the scraper section of the config.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        let client = build_client(&config.user_agent, config.request_timeout())?;
        Ok(Self { client })
    }
}

fn build_client(user_agent: &str, timeout: Option<Duration>) -> anyhow::Result<Client> {
    let mut builder = Client::builder()
        .user_agent(user_agent)
        .pool_max_idle_per_host(10);

    match timeout {
        Some(timeout) => {
            info!("Scraper requests time out after {:?}", timeout);
            builder = builder.timeout(timeout);
        }
        None => {
            info!("Scraper requests have no timeout; a stalled page blocks its worker");
        }
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;

        let status = response.status();
        let response = response
            .error_for_status()
            .map_err(|e| ScrapeError::transport(url, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::transport(url, e))?;

        debug!(url, status = status.as_u16(), bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
