use super::print_products;
use crate::config::Config;
use crate::services::ResultSource;
use crate::state::SharedState;

pub async fn cmd_scrape(config: Config, query: &str, no_cache: bool, json: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let (outcome, pending) = state
        .search_service
        .search_with_store(query, !no_cache)
        .await;

    // The process exits right after printing; let the store land first.
    if let Some(pending) = pending
        && !pending.await.unwrap_or(false)
    {
        eprintln!("Warning: results could not be saved to the cache");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match outcome.source {
            ResultSource::Cache => println!("Cached results for '{}':", outcome.term),
            ResultSource::Scrape => println!(
                "Scraped {} products for '{}':",
                outcome.total_products, outcome.term
            ),
        }
        println!("{:-<60}", "");

        if outcome.products.is_empty() {
            println!("No products found.");
        } else {
            print_products(&outcome.products);
        }
    }

    state.store.close().await?;
    Ok(())
}
