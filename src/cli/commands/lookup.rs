use super::print_products;
use crate::config::Config;
use crate::db::Store;
use crate::services::{ResultCache, SeaOrmResultCache, normalize_term};

pub async fn cmd_lookup(config: &Config, query: &str, json: bool) -> anyhow::Result<()> {
    let term = normalize_term(query, &config.scraper.term_separator);
    let store = Store::new(&config.general.database_path).await?;
    let cache = SeaOrmResultCache::new(store.clone());

    let products = cache.lookup(&term).await?;

    match (products, json) {
        (Some(products), true) => println!("{}", serde_json::to_string_pretty(&products)?),
        (None, true) => println!("null"),
        (Some(products), false) => {
            println!("Cached results for '{term}' ({} products):", products.len());
            println!("{:-<60}", "");
            print_products(&products);
        }
        (None, false) => {
            println!("Nothing cached for '{term}'.");
            println!("To scrape it: revkart scrape {query}");
        }
    }

    store.close().await?;
    Ok(())
}
