pub use super::scraped_products::Entity as ScrapedProducts;
