use crate::config::Config;
use crate::db::Store;
use crate::services::normalize_term;

pub async fn cmd_history(config: &Config, query: &str, limit: u64) -> anyhow::Result<()> {
    let term = normalize_term(query, &config.scraper.term_separator);
    let store = Store::new(&config.general.database_path).await?;
    let batches = store.batches_for_term(&term, limit).await?;

    if batches.is_empty() {
        println!("No stored scrapes for '{term}'.");
    } else {
        println!("Stored scrapes for '{}' (last {}):", term, batches.len());
        println!("{:-<70}", "");

        for batch in batches {
            println!("• {} - {} products", batch.created_at, batch.product_count);
            println!("  Batch: {}", batch.batch_id);
        }
    }

    store.close().await?;
    Ok(())
}
