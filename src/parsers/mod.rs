pub mod detail;
pub mod listing;
pub mod text;


pub use detail::BodyExtractor;
pub use listing::{ListingParser, ListingReport};

use crate::error::ConfigError;
use scraper::Selector;

/// Compiles a CSS selector, reporting failures as configuration errors
pub(crate) fn selector(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::Selector(format!("{css}: {e:?}")))
}
