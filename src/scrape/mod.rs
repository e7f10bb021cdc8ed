//! Concurrent scrape-and-aggregate pipeline.
//!
//! The orchestrator fetches a search results page, fans out one product
//! worker per discovered link, and each product worker fans out one review
//! worker per review fragment. Every level joins all of its children and
//! keeps discovery order. Failures are absorbed where they happen: a bad
//! fetch or a missing marker becomes an absent field or an empty list.

pub mod extract;
pub mod pipeline;

pub use extract::{MarkupReviewExtractor, ReviewExtractor, ReviewFields};
pub use pipeline::{FanOutLimits, Scraper};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("marker `{marker}` not found")]
    MissingMarker { marker: &'static str },

    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl ScrapeError {
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Label used for the `kind` dimension of failure metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::MissingMarker { .. } | Self::Extraction(_) => "extraction",
        }
    }
}
