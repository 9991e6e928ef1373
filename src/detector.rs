//! One scan cycle: fetch, extract, diff against the seen set, persist.

use crate::error::FetchError;
use crate::models::Listing;
use crate::scrapers::{ListingExtractor, ScraperTrait};
use crate::storage::SeenSetStore;
use std::collections::BTreeSet;
use tracing::{error, info};

pub struct ChangeDetector<S> {
    scraper: S,
    extractor: ListingExtractor,
    store: SeenSetStore,
}

impl<S: ScraperTrait> ChangeDetector<S> {
    pub fn new(scraper: S, extractor: ListingExtractor, store: SeenSetStore) -> Self {
        Self {
            scraper,
            extractor,
            store,
        }
    }

    pub fn store(&self) -> &SeenSetStore {
        &self.store
    }

    /// Fetch and extract the current listings without touching the seen set
    pub async fn current_listings(&self) -> Result<Vec<Listing>, FetchError> {
        let html = self.scraper.fetch_page().await?;
        Ok(self.extractor.listings(&html))
    }

    /// Listings that were not on the page during the last completed scan.
    ///
    /// A fetch failure returns nothing and leaves the seen set untouched.
    /// Otherwise the seen set is replaced by exactly the ids on the page now,
    /// so a listing that disappears and comes back is reported again.
    pub async fn run(&self) -> Vec<Listing> {
        let current = match self.current_listings().await {
            Ok(listings) => listings,
            Err(e) => {
                error!(site = self.scraper.source_name(), error = %e, "Fetch failed, skipping cycle");
                return Vec::new();
            }
        };

        let seen = self.store.load().await;
        let current_ids: BTreeSet<String> = current.iter().map(|l| l.id.clone()).collect();

        let new_listings: Vec<Listing> = current
            .into_iter()
            .filter(|listing| !seen.contains(&listing.id))
            .collect();

        self.store.save(&current_ids).await;

        info!(
            "Found {} new listings ({} on page, {} previously seen)",
            new_listings.len(),
            current_ids.len(),
            seen.len()
        );
        new_listings
    }
}
