use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::ScrapeError;
use crate::constants::markers;
use crate::constants::scrape::READ_MORE_SUFFIX;
use crate::models::ReviewRecord;

/// Parsed marker selectors, built once per process.
struct Markers {
    product_link: Selector,
    product_name: Selector,
    review_fragment: Selector,
    reviewer_name: Selector,
    review_summary: Selector,
    review_description: Selector,
    review_rating: Selector,
}

impl Markers {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<Markers>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    product_link: Selector::parse(markers::PRODUCT_LINK).ok()?,
                    product_name: Selector::parse(markers::PRODUCT_NAME).ok()?,
                    review_fragment: Selector::parse(markers::REVIEW_FRAGMENT).ok()?,
                    reviewer_name: Selector::parse(markers::REVIEWER_NAME).ok()?,
                    review_summary: Selector::parse(markers::REVIEW_SUMMARY).ok()?,
                    review_description: Selector::parse(markers::REVIEW_DESCRIPTION).ok()?,
                    review_rating: Selector::parse(markers::REVIEW_RATING).ok()?,
                })
            })
            .as_ref()
    }

    fn require() -> Result<&'static Self, ScrapeError> {
        Self::get().ok_or_else(|| ScrapeError::Extraction("marker selectors failed to parse".into()))
    }
}

fn first_text(
    scope: ElementRef<'_>,
    selector: &Selector,
    marker: &'static str,
) -> Result<String, ScrapeError> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or(ScrapeError::MissingMarker { marker })
}

fn strip_read_more(text: &str) -> String {
    text.replace(READ_MORE_SUFFIX, "").trim().to_string()
}

/// Product links on a search results page, in document order, each
/// prefixed with `base_url`.
///
/// Yields nothing (and logs) when the link marker is absent.
pub fn extract_links<'a>(document: &'a Html, base_url: &'a str) -> impl Iterator<Item = String> + 'a {
    let mut anchors = Markers::get()
        .map(|m| document.select(&m.product_link))
        .into_iter()
        .flatten()
        .peekable();

    if anchors.peek().is_none() {
        warn!(
            marker = markers::PRODUCT_LINK,
            "No product links on results page"
        );
    }

    anchors.filter_map(move |anchor| match anchor.value().attr("href") {
        Some(href) => Some(format!("{base_url}{href}")),
        None => {
            debug!("Product link without href skipped");
            None
        }
    })
}

/// What a product worker needs from its page, detached from the parsed
/// document so it can cross task boundaries.
#[derive(Debug)]
pub struct ProductPage {
    pub name: Result<String, ScrapeError>,
    /// Outer HTML of each review fragment, in page order.
    pub fragments: Vec<String>,
}

pub fn parse_product_page(body: &str) -> ProductPage {
    let document = Html::parse_document(body);

    let markers = match Markers::require() {
        Ok(m) => m,
        Err(e) => {
            return ProductPage {
                name: Err(e),
                fragments: Vec::new(),
            };
        }
    };

    let name = first_text(
        document.root_element(),
        &markers.product_name,
        markers::PRODUCT_NAME,
    );

    let fragments = document
        .select(&markers.review_fragment)
        .map(|fragment| fragment.html())
        .collect();

    ProductPage { name, fragments }
}

/// Per-field extraction outcome for one review fragment.
#[derive(Debug)]
pub struct ReviewFields {
    pub name: Result<String, ScrapeError>,
    pub short_summary: Result<String, ScrapeError>,
    pub description: Result<String, ScrapeError>,
    pub rating: Result<String, ScrapeError>,
}

impl ReviewFields {
    /// Looks up all four fields independently; one missing marker does not
    /// affect the others.
    pub fn parse(fragment: &str) -> Self {
        let html = Html::parse_fragment(fragment);

        let markers = match Markers::require() {
            Ok(m) => m,
            Err(e) => {
                let message = e.to_string();
                return Self {
                    name: Err(e),
                    short_summary: Err(ScrapeError::Extraction(message.clone())),
                    description: Err(ScrapeError::Extraction(message.clone())),
                    rating: Err(ScrapeError::Extraction(message)),
                };
            }
        };

        let root = html.root_element();
        Self {
            name: first_text(root, &markers.reviewer_name, markers::REVIEWER_NAME),
            short_summary: first_text(root, &markers.review_summary, markers::REVIEW_SUMMARY),
            description: first_text(
                root,
                &markers.review_description,
                markers::REVIEW_DESCRIPTION,
            )
            .map(|text| strip_read_more(&text)),
            rating: first_text(root, &markers.review_rating, markers::REVIEW_RATING),
        }
    }

    /// Drops failed fields to `None`, logging each one.
    pub fn into_record(self) -> ReviewRecord {
        ReviewRecord {
            name: settle("name", self.name),
            short_summary: settle("short_summary", self.short_summary),
            description: settle("description", self.description),
            rating: settle("rating", self.rating),
        }
    }
}

fn settle(field: &'static str, outcome: Result<String, ScrapeError>) -> Option<String> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(field, error = %e, "Review field not extracted");
            metrics::counter!("scrape_failures_total", "kind" => e.kind()).increment(1);
            None
        }
    }
}

pub fn extract_review(fragment: &str) -> ReviewRecord {
    ReviewFields::parse(fragment).into_record()
}

/// Turns one review fragment into a record. Runs on a blocking thread, one
/// call per fragment.
pub trait ReviewExtractor: Send + Sync {
    fn extract(&self, fragment: &str) -> Result<ReviewRecord, ScrapeError>;
}

/// Reads the site's review markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupReviewExtractor;

impl ReviewExtractor for MarkupReviewExtractor {
    fn extract(&self, fragment: &str) -> Result<ReviewRecord, ScrapeError> {
        Ok(extract_review(fragment))
    }
}
