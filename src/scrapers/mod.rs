pub mod extractor;
pub mod pararius;
pub mod traits;
pub mod types;

pub use extractor::{Extraction, ListingExtractor, SkipReason};
pub use pararius::ParariusScraper;
pub use traits::ScraperTrait;
pub use types::SearchTarget;
