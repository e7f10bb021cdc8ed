pub mod prelude;

pub mod scraped_products;
