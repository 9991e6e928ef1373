use crate::error::FetchError;
use async_trait::async_trait;

/// Fetch boundary for a listing site.
/// Implementations do a single attempt per call; there is no retry.
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Download the raw search results page
    async fn fetch_page(&self) -> Result<String, FetchError>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
