mod common;

use async_trait::async_trait;
use common::{BASE, FakeSite, product_page, review, test_config};
use revkart::db::{Store, StoredBatch};
use revkart::models::{CacheEntry, ProductRecord, ReviewRecord};
use revkart::scrape::{FanOutLimits, Scraper};
use revkart::services::{
    CacheError, ResultCache, ResultSource, SeaOrmResultCache, SearchService, store_detached,
};
use revkart::state::SharedState;
use std::sync::Arc;

async fn memory_cache() -> SeaOrmResultCache {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");
    SeaOrmResultCache::new(store)
}

fn sample_products() -> Vec<ProductRecord> {
    vec![
        ProductRecord {
            name: Some("Nova 5G".to_string()),
            reviews: vec![
                ReviewRecord {
                    name: Some("Asha".to_string()),
                    short_summary: Some("Great".to_string()),
                    description: Some("Battery lasts two days.".to_string()),
                    rating: Some("5".to_string()),
                },
                ReviewRecord {
                    rating: Some("2".to_string()),
                    ..Default::default()
                },
            ],
        },
        ProductRecord::default(),
        ProductRecord {
            name: Some("Orbit X".to_string()),
            reviews: Vec::new(),
        },
    ]
}

fn phone_site() -> FakeSite {
    FakeSite::new()
        .results("red+phone", &["/p/nova", "/p/orbit"])
        .product(
            "/p/nova",
            product_page(Some("Nova 5G"), &[review("Asha", "Great", "Solid.", "5")]),
        )
        .product(
            "/p/orbit",
            product_page(Some("Orbit X"), &[review("Ravi", "Fine", "Okay.", "3")]),
        )
}

#[tokio::test]
async fn test_store_then_lookup_round_trip() {
    let cache = memory_cache().await;
    let products = sample_products();

    cache
        .store(&CacheEntry::new("red+phone", &products))
        .await
        .unwrap();

    let found = cache.lookup("red+phone").await.unwrap();
    assert_eq!(found, Some(products));
}

#[tokio::test]
async fn test_lookup_is_exact_match() {
    let cache = memory_cache().await;
    cache
        .store(&CacheEntry::new("red+phone", &sample_products()))
        .await
        .unwrap();

    assert_eq!(cache.lookup("red phone").await.unwrap(), None);
    assert_eq!(cache.lookup("RED+PHONE").await.unwrap(), None);
    assert_eq!(cache.lookup("red").await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_entry_is_a_miss() {
    let cache = memory_cache().await;
    cache.store(&CacheEntry::new("void", &[])).await.unwrap();

    assert_eq!(cache.lookup("void").await.unwrap(), None);
    assert!(cache.history("void", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_latest_entry_wins_and_history_keeps_all() {
    let cache = memory_cache().await;
    let first = sample_products();
    let second = vec![ProductRecord {
        name: Some("Nova 6".to_string()),
        reviews: Vec::new(),
    }];

    cache.store(&CacheEntry::new("phone", &first)).await.unwrap();
    cache.store(&CacheEntry::new("phone", &second)).await.unwrap();

    assert_eq!(cache.lookup("phone").await.unwrap(), Some(second));

    let history: Vec<StoredBatch> = cache.history("phone", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].product_count, 1);
    assert_eq!(history[1].product_count, 3);
    assert_ne!(history[0].batch_id, history[1].batch_id);
    assert!(history.iter().all(|b| b.search_term == "phone"));

    assert_eq!(cache.history("phone", 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_detached_store_lands() {
    let cache: Arc<dyn ResultCache> = Arc::new(memory_cache().await);
    let products = sample_products();

    let handle = store_detached(Arc::clone(&cache), CacheEntry::new("tv", &products));
    assert!(handle.await.unwrap());

    assert_eq!(cache.lookup("tv").await.unwrap(), Some(products));
}

#[tokio::test]
async fn test_cache_hit_skips_the_site() {
    let site = Arc::new(phone_site());
    let state = SharedState::with_source(test_config(), site.clone())
        .await
        .unwrap();

    let (first, pending) = state
        .search_service
        .search_with_store("red phone", true)
        .await;
    assert_eq!(first.source, ResultSource::Scrape);
    assert_eq!(first.term, "red+phone");
    assert_eq!(first.total_products, 2);
    assert!(pending.expect("fresh scrape schedules a store").await.unwrap());

    let hits_after_scrape = site.hits();
    assert_eq!(hits_after_scrape, 3);

    let second = state.search_service.search("red phone").await;
    assert_eq!(second.source, ResultSource::Cache);
    assert_eq!(second.products, first.products);
    assert_eq!(site.hits(), hits_after_scrape);
}

#[tokio::test]
async fn test_refresh_scrapes_even_when_cached() {
    let site = Arc::new(phone_site());
    let state = SharedState::with_source(test_config(), site.clone())
        .await
        .unwrap();

    let (_, pending) = state
        .search_service
        .search_with_store("red phone", true)
        .await;
    pending.unwrap().await.unwrap();

    let refreshed = state.search_service.refresh("red phone").await;
    assert_eq!(refreshed.source, ResultSource::Scrape);
    assert_eq!(site.hits(), 6);
}

/// Every call fails, as if the database were gone.
struct BrokenCache;

#[async_trait]
impl ResultCache for BrokenCache {
    async fn lookup(&self, _term: &str) -> Result<Option<Vec<ProductRecord>>, CacheError> {
        Err(CacheError::Database("database is locked".to_string()))
    }

    async fn store(&self, _entry: &CacheEntry) -> Result<(), CacheError> {
        Err(CacheError::Database("database is locked".to_string()))
    }

    async fn history(&self, _term: &str, _limit: u64) -> Result<Vec<StoredBatch>, CacheError> {
        Err(CacheError::Database("database is locked".to_string()))
    }
}

#[tokio::test]
async fn test_broken_cache_still_serves_scrapes() {
    let site = Arc::new(phone_site());
    let scraper = Scraper::with_markup_reviews(site.clone(), BASE, FanOutLimits::UNBOUNDED);
    let service = SearchService::new(Arc::new(BrokenCache), scraper, "+");

    let (outcome, pending) = service.search_with_store("red phone", true).await;

    assert_eq!(outcome.source, ResultSource::Scrape);
    assert_eq!(outcome.products.len(), 2);
    assert!(!pending.unwrap().await.unwrap());
}
