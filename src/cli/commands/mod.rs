mod history;
mod lookup;
mod scrape;

pub use history::cmd_history;
pub use lookup::cmd_lookup;
pub use scrape::cmd_scrape;

use crate::models::ProductRecord;

fn print_products(products: &[ProductRecord]) {
    for (index, product) in products.iter().enumerate() {
        println!("{}. {}", index + 1, product.display_name());

        if product.reviews.is_empty() {
            println!("   (no reviews)");
        }

        for review in &product.reviews {
            let rating = review.rating.as_deref().unwrap_or("-");
            let summary = review.short_summary.as_deref().unwrap_or("-");
            let name = review.name.as_deref().unwrap_or("Anonymous");
            println!("   • [{rating}] {summary} ({name})");
            if let Some(description) = review.description.as_deref() {
                println!("     {description}");
            }
        }
        println!();
    }
}
