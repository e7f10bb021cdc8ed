/// CSS selectors for the scraped site's markup. These track the site's
/// generated class names and change whenever its layout does.
pub mod markers {

    pub const PRODUCT_LINK: &str = "a._1fQZEK";

    pub const PRODUCT_NAME: &str = "span.B_NuCI";

    pub const REVIEW_FRAGMENT: &str = "div.col._2wzgFH";

    pub const REVIEWER_NAME: &str = "p._2sc7ZR._2V5EHH";

    pub const REVIEW_SUMMARY: &str = "p._2-N8zT";

    pub const REVIEW_DESCRIPTION: &str = "div.t-ZTKy";

    pub const REVIEW_RATING: &str = "div._3LWZlK._1BLPMq";
}

pub mod scrape {

    /// Trailing link text the site appends to truncated review bodies.
    pub const READ_MORE_SUFFIX: &str = "READ MORE";

    pub const FIRST_PAGE: u32 = 1;
}

pub mod limits {

    pub const DEFAULT_HISTORY_LIMIT: u64 = 20;
}
