pub mod site;

pub use site::{HttpFetcher, PageSource, search_url};
