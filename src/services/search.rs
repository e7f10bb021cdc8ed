use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::ProductRecord;
use crate::scrape::Scraper;
use crate::services::cache::{ResultCache, store_detached};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Cache,
    Scrape,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub term: String,
    pub source: ResultSource,
    pub total_products: usize,
    pub products: Vec<ProductRecord>,
}

/// Replaces every whitespace character in `raw` with `separator`. No other
/// cleaning is done; the result is used verbatim as cache key and query.
#[must_use]
pub fn normalize_term(raw: &str, separator: &str) -> String {
    let mut term = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_whitespace() {
            term.push_str(separator);
        } else {
            term.push(c);
        }
    }
    term
}

/// Cache-first search: lookup, then on a miss scrape and hand the results to
/// a detached store.
pub struct SearchService {
    cache: Arc<dyn ResultCache>,
    scraper: Scraper,
    separator: String,
}

impl SearchService {
    #[must_use]
    pub fn new(cache: Arc<dyn ResultCache>, scraper: Scraper, separator: &str) -> Self {
        Self {
            cache,
            scraper,
            separator: separator.to_string(),
        }
    }

    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        normalize_term(raw, &self.separator)
    }

    pub async fn search(&self, raw: &str) -> SearchOutcome {
        self.search_inner(raw, true).await.0
    }

    /// Scrapes even when the term is cached. The fresh result is still stored.
    pub async fn refresh(&self, raw: &str) -> SearchOutcome {
        self.search_inner(raw, false).await.0
    }

    /// Like [`search`](Self::search) but also returns the pending store, for
    /// callers that must not exit before it lands.
    pub async fn search_with_store(
        &self,
        raw: &str,
        use_cache: bool,
    ) -> (SearchOutcome, Option<JoinHandle<bool>>) {
        self.search_inner(raw, use_cache).await
    }

    /// Cached products for a term, without ever scraping. A failed read is
    /// reported as a miss.
    pub async fn cached(&self, term: &str) -> Option<Vec<ProductRecord>> {
        match self.cache.lookup(term).await {
            Ok(hit) => {
                let outcome = if hit.is_some() { "hit" } else { "miss" };
                metrics::counter!("cache_lookups_total", "outcome" => outcome).increment(1);
                hit
            }
            Err(e) => {
                warn!(term, error = %e, "Cache lookup failed, treating as miss");
                metrics::counter!("cache_lookups_total", "outcome" => "error").increment(1);
                None
            }
        }
    }

    async fn search_inner(
        &self,
        raw: &str,
        use_cache: bool,
    ) -> (SearchOutcome, Option<JoinHandle<bool>>) {
        let term = self.normalize(raw);

        if use_cache && let Some(products) = self.cached(&term).await {
            info!(term = %term, products = products.len(), "Serving cached results");
            return (
                SearchOutcome {
                    total_products: products.len(),
                    term,
                    source: ResultSource::Cache,
                    products,
                },
                None,
            );
        }

        let (products, entry) = self.scraper.scrape(&term).await;
        let pending = store_detached(Arc::clone(&self.cache), entry);

        (
            SearchOutcome {
                total_products: products.len(),
                term,
                source: ResultSource::Scrape,
                products,
            },
            Some(pending),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_term_replaces_whitespace() {
        assert_eq!(normalize_term("red phone", "+"), "red+phone");
        assert_eq!(normalize_term(" a\tb ", "+"), "+a+b+");
        assert_eq!(normalize_term("tv", "+"), "tv");
        assert_eq!(normalize_term("smart watch", "-"), "smart-watch");
    }
}
