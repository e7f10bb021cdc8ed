pub mod cache;
pub use cache::{CacheError, ResultCache, SeaOrmResultCache, store_detached};

pub mod search;
pub use search::{ResultSource, SearchOutcome, SearchService, normalize_term};
