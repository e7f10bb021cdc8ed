pub mod product;

pub use product::{CacheEntry, ProductRecord, ReviewRecord, ScrapeResult, TaggedProduct};
