//! Result cache keyed by search term.
//!
//! Lookups sit on the request path; stores are detached so a slow or failed
//! write never holds up a response.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::db::{Store, StoredBatch};
use crate::models::{CacheEntry, ProductRecord};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<serde_json::Error>().is_some() {
            Self::Serialization(err.to_string())
        } else {
            Self::Database(err.to_string())
        }
    }
}

impl From<sea_orm::DbErr> for CacheError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Products stored for exactly `term`, or `None` when there are none.
    async fn lookup(&self, term: &str) -> Result<Option<Vec<ProductRecord>>, CacheError>;

    /// Appends `entry`; earlier entries for the same term stay.
    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Stored entries for `term`, newest first.
    async fn history(&self, term: &str, limit: u64) -> Result<Vec<StoredBatch>, CacheError>;
}

pub struct SeaOrmResultCache {
    store: Store,
}

impl SeaOrmResultCache {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResultCache for SeaOrmResultCache {
    async fn lookup(&self, term: &str) -> Result<Option<Vec<ProductRecord>>, CacheError> {
        let products = self.store.latest_products(term).await?;
        Ok(if products.is_empty() {
            None
        } else {
            Some(products)
        })
    }

    async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        match self.store.insert_entry(entry).await? {
            Some(batch_id) => info!(
                term = %entry.search_term,
                batch_id = %batch_id,
                products = entry.products.len(),
                "Stored scrape results"
            ),
            None => debug!(term = %entry.search_term, "Nothing to store for empty scrape"),
        }
        Ok(())
    }

    async fn history(&self, term: &str, limit: u64) -> Result<Vec<StoredBatch>, CacheError> {
        Ok(self.store.batches_for_term(term, limit).await?)
    }
}

/// Starts `store(entry)` on its own task and returns without waiting. The
/// handle resolves to whether the write succeeded; callers normally drop it.
pub fn store_detached(cache: Arc<dyn ResultCache>, entry: CacheEntry) -> JoinHandle<bool> {
    tokio::spawn(async move {
        match cache.store(&entry).await {
            Ok(()) => true,
            Err(e) => {
                error!(term = %entry.search_term, error = %e, "Failed to store scrape results");
                metrics::counter!("cache_store_failures_total").increment(1);
                false
            }
        }
    })
}
