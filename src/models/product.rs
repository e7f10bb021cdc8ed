use serde::{Deserialize, Serialize};

/// One review as extracted from a product page. A field is `None` when its
/// marker could not be read, never an empty placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub name: Option<String>,
    #[serde(rename = "in_short")]
    pub short_summary: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "ratings")]
    pub rating: Option<String>,
}

impl ReviewRecord {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.short_summary.is_some()
            && self.description.is_some()
            && self.rating.is_some()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.short_summary.is_none()
            && self.description.is_none()
            && self.rating.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: Option<String>,
    /// Page order of the review fragments.
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
}

impl ProductRecord {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown product")
    }
}

/// Products in link discovery order.
pub type ScrapeResult = Vec<ProductRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedProduct {
    pub search_term: String,
    pub product: ProductRecord,
}

/// The persisted projection of one completed scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub search_term: String,
    pub products: Vec<TaggedProduct>,
}

impl CacheEntry {
    #[must_use]
    pub fn new(search_term: &str, products: &[ProductRecord]) -> Self {
        Self {
            search_term: search_term.to_string(),
            products: products
                .iter()
                .map(|product| TaggedProduct {
                    search_term: search_term.to_string(),
                    product: product.clone(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<ProductRecord> {
        self.products.iter().map(|p| p.product.clone()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
