use futures::stream::{self, StreamExt};
use scraper::Html;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::extract::{self, ProductPage, ReviewExtractor};
use crate::clients::PageSource;
use crate::config::ScraperConfig;
use crate::models::{CacheEntry, ProductRecord, ReviewRecord, ScrapeResult};

/// Caps on how many workers run at once at each level. Zero means one task
/// per item with no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutLimits {
    pub products: usize,
    pub reviews: usize,
}

impl FanOutLimits {
    pub const UNBOUNDED: Self = Self {
        products: 0,
        reviews: 0,
    };

    #[must_use]
    pub const fn from_config(config: &ScraperConfig) -> Self {
        Self {
            products: config.max_concurrent_products,
            reviews: config.max_concurrent_reviews,
        }
    }
}

const fn width(limit: usize) -> usize {
    if limit == 0 { usize::MAX } else { limit }
}

/// Join handle that aborts its task when dropped unfinished, so dropping a
/// scrape midway takes its workers down with it. Blocking tasks already
/// running cannot be aborted and simply run to completion.
struct Joined<T>(JoinHandle<T>);

impl<T> Future for Joined<T> {
    type Output = Result<T, JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().0).poll(cx)
    }
}

impl<T> Drop for Joined<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Scrape orchestrator. Cheap to clone; every product worker owns a clone.
#[derive(Clone)]
pub struct Scraper {
    source: Arc<dyn PageSource>,
    reviews: Arc<dyn ReviewExtractor>,
    base_url: Arc<str>,
    limits: FanOutLimits,
}

impl Scraper {
    #[must_use]
    pub fn new(
        source: Arc<dyn PageSource>,
        reviews: Arc<dyn ReviewExtractor>,
        base_url: &str,
        limits: FanOutLimits,
    ) -> Self {
        Self {
            source,
            reviews,
            base_url: Arc::from(base_url),
            limits,
        }
    }

    /// Uses the site's own review markers.
    #[must_use]
    pub fn with_markup_reviews(
        source: Arc<dyn PageSource>,
        base_url: &str,
        limits: FanOutLimits,
    ) -> Self {
        Self::new(
            source,
            Arc::new(extract::MarkupReviewExtractor),
            base_url,
            limits,
        )
    }

    /// Scrapes every product listed for `term`.
    ///
    /// Never fails: an unreachable results page or a page without product
    /// links gives an empty result. The returned entry is the same products
    /// tagged with `term`, ready for the result cache.
    pub async fn scrape(&self, term: &str) -> (ScrapeResult, CacheEntry) {
        let span = info_span!("scrape", term = %term);
        async move {
            let start = Instant::now();
            metrics::counter!("scrape_runs_total").increment(1);

            let links = self.discover_links(term).await;
            info!(links = links.len(), "Discovered product links");

            let products: ScrapeResult = stream::iter(links)
                .map(|url| {
                    let worker = self.clone();
                    Joined(tokio::spawn(
                        async move { worker.scrape_product(&url).await }
                            .instrument(tracing::Span::current()),
                    ))
                })
                .buffered(width(self.limits.products))
                .map(|joined| {
                    joined.unwrap_or_else(|e| {
                        error!(error = %e, "Product worker aborted");
                        metrics::counter!("scrape_failures_total", "kind" => "worker").increment(1);
                        ProductRecord::default()
                    })
                })
                .collect()
                .await;

            let entry = CacheEntry::new(term, &products);

            metrics::counter!("scrape_products_total").increment(products.len() as u64);
            metrics::histogram!("scrape_duration_seconds").record(start.elapsed().as_secs_f64());
            info!(
                products = products.len(),
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Scrape finished"
            );

            (products, entry)
        }
        .instrument(span)
        .await
    }

    async fn discover_links(&self, term: &str) -> Vec<String> {
        let body = match self.source.fetch(&self.base_url, Some(term), None).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Search results page unavailable");
                metrics::counter!("scrape_failures_total", "kind" => e.kind()).increment(1);
                return Vec::new();
            }
        };

        let document = Html::parse_document(&body);
        extract::extract_links(&document, &self.base_url).collect()
    }

    /// Product worker: one page, one record.
    ///
    /// A fetch failure yields a record with no name and no reviews. Reviews
    /// come back in fragment order, one entry per fragment, whether or not
    /// the fragment could be read.
    pub async fn scrape_product(&self, url: &str) -> ProductRecord {
        let body = match self.source.fetch(url, None, None).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "Product page unavailable");
                metrics::counter!("scrape_failures_total", "kind" => e.kind()).increment(1);
                return ProductRecord::default();
            }
        };

        let ProductPage { name, fragments } = extract::parse_product_page(&body);

        let name = match name {
            Ok(name) => Some(name),
            Err(e) => {
                warn!(url, error = %e, "Product name not extracted");
                metrics::counter!("scrape_failures_total", "kind" => e.kind()).increment(1);
                None
            }
        };

        debug!(url, fragments = fragments.len(), "Spawning review workers");
        let reviews = self.collect_reviews(url, fragments).await;
        metrics::counter!("scrape_reviews_total").increment(reviews.len() as u64);

        ProductRecord { name, reviews }
    }

    async fn collect_reviews(&self, url: &str, fragments: Vec<String>) -> Vec<ReviewRecord> {
        stream::iter(fragments)
            .map(|fragment| {
                let extractor = Arc::clone(&self.reviews);
                Joined(tokio::task::spawn_blocking(move || extractor.extract(&fragment)))
            })
            .buffered(width(self.limits.reviews))
            .map(|joined| match joined {
                Ok(Ok(review)) => review,
                Ok(Err(e)) => {
                    warn!(url, error = %e, "Review not extracted");
                    metrics::counter!("scrape_failures_total", "kind" => e.kind()).increment(1);
                    ReviewRecord::default()
                }
                Err(e) => {
                    error!(url, error = %e, "Review worker aborted");
                    metrics::counter!("scrape_failures_total", "kind" => "worker").increment(1);
                    ReviewRecord::default()
                }
            })
            .collect()
            .await
    }
}
