use std::sync::Arc;

use crate::clients::{HttpFetcher, PageSource};
use crate::config::Config;
use crate::db::Store;
use crate::scrape::{FanOutLimits, Scraper};
use crate::services::{ResultCache, SeaOrmResultCache, SearchService};

/// Everything built once at start-up and shared by the HTTP layer and the
/// CLI commands.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub cache: Arc<dyn ResultCache>,

    pub scraper: Scraper,

    pub search_service: Arc<SearchService>,
}

impl SharedState {
    /// Connects the database and talks to the live site over HTTP.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let source = Arc::new(HttpFetcher::new(&config.scraper)?);
        Self::with_source(config, source).await
    }

    /// Same wiring with a caller-supplied page source.
    pub async fn with_source(config: Config, source: Arc<dyn PageSource>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let scraper = Scraper::with_markup_reviews(
            source,
            &config.scraper.base_url,
            FanOutLimits::from_config(&config.scraper),
        );

        Ok(Self::assemble(config, store, scraper))
    }

    /// Wires an already-built store and scraper together.
    #[must_use]
    pub fn assemble(config: Config, store: Store, scraper: Scraper) -> Self {
        let cache: Arc<dyn ResultCache> = Arc::new(SeaOrmResultCache::new(store.clone()));

        let search_service = Arc::new(SearchService::new(
            Arc::clone(&cache),
            scraper.clone(),
            &config.scraper.term_separator,
        ));

        Self {
            config: Arc::new(config),
            store,
            cache,
            scraper,
            search_service,
        }
    }
}
