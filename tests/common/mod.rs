#![allow(dead_code)]

use async_trait::async_trait;
use rand::Rng;
use revkart::clients::PageSource;
use revkart::config::Config;
use revkart::scrape::ScrapeError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BASE: &str = "http://shop.test";

/// In-memory stand-in for the shop. Unknown URLs fail like a refused
/// connection; every request, served or not, is counted.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    max_delay_ms: u64,
    hits: AtomicUsize,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each response waits a random 0..=`max_ms` milliseconds, so workers
    /// finish in an order unrelated to the order they started.
    pub fn with_random_delay(mut self, max_ms: u64) -> Self {
        self.max_delay_ms = max_ms;
        self
    }

    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Registers the results page for `term` listing `paths` in order.
    pub fn results(self, term: &str, paths: &[&str]) -> Self {
        self.page(
            format!("{BASE}/search?q={term}&page=1"),
            results_page(paths),
        )
    }

    pub fn product(self, path: &str, body: String) -> Self {
        self.page(format!("{BASE}{path}"), body)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FakeSite {
    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        self.hits.fetch_add(1, Ordering::SeqCst);

        if self.max_delay_ms > 0 {
            let delay = rand::rng().random_range(0..=self.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::transport(url, "connection refused"))
    }
}

pub fn results_page(paths: &[&str]) -> String {
    let anchors: String = paths
        .iter()
        .map(|path| format!(r#"<div><a class="_1fQZEK" href="{path}">item</a></div>"#))
        .collect();
    format!("<html><body><div id=\"results\">{anchors}</div></body></html>")
}

pub fn product_page(name: Option<&str>, reviews: &[String]) -> String {
    let title = name
        .map(|n| format!(r#"<h1><span class="B_NuCI">{n}</span></h1>"#))
        .unwrap_or_default();
    format!(
        "<html><body>{title}<div class=\"reviews\">{}</div></body></html>",
        reviews.concat()
    )
}

pub fn review(name: &str, summary: &str, description: &str, rating: &str) -> String {
    format!(
        r#"<div class="col _2wzgFH"><div class="_3LWZlK _1BLPMq">{rating}</div><p class="_2-N8zT">{summary}</p><div class="t-ZTKy"><div>{description}</div>READ MORE</div><p class="_2sc7ZR _2V5EHH">{name}</p></div>"#
    )
}

/// A review fragment carrying only a rating.
pub fn bare_review(rating: &str) -> String {
    format!(r#"<div class="col _2wzgFH"><div class="_3LWZlK _1BLPMq">{rating}</div></div>"#)
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.scraper.base_url = BASE.to_string();
    config.observability.metrics_enabled = false;
    config
}
