pub mod identity;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use identity::listing_id;

pub const PRICE_PLACEHOLDER: &str = "Price not available";
pub const LOCATION_PLACEHOLDER: &str = "Location not available";
pub const DETAILS_PLACEHOLDER: &str = "Details not available";

/// One apartment listing as shown on the search results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    /// Fingerprint derived from title, location and price
    pub id: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub details: String,
    /// Absolute URL of the listing detail page
    pub link: String,
    pub observed_at: DateTime<Utc>,
}

impl Listing {
    /// Build a listing observed now. The id is always derived, never supplied.
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        location: impl Into<String>,
        details: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self::observed_at(title, price, location, details, link, Utc::now())
    }

    pub fn observed_at(
        title: impl Into<String>,
        price: impl Into<String>,
        location: impl Into<String>,
        details: impl Into<String>,
        link: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        let title = title.into();
        let price = price.into();
        let location = location.into();
        Self {
            id: listing_id(&title, &location, &price),
            title,
            price,
            location,
            details: details.into(),
            link: link.into(),
            observed_at,
        }
    }
}

/// One delivered batch in the persisted notification log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub timestamp: DateTime<Utc>,
    pub count: usize,
    pub listings: Vec<Listing>,
}

impl NotificationRecord {
    pub fn new(listings: &[Listing]) -> Self {
        Self {
            timestamp: Utc::now(),
            count: listings.len(),
            listings: listings.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_id_ignores_timestamp_and_link() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 20, 30, 0).unwrap();

        let a = Listing::observed_at(
            "Studio X",
            "€900",
            "Delft",
            "1 room",
            "https://www.pararius.nl/a",
            early,
        );
        let b = Listing::observed_at(
            "Studio X",
            "€900",
            "Delft",
            "different details",
            "https://www.pararius.nl/b",
            late,
        );

        assert_eq!(a.id, b.id);
        assert_ne!(a, b);
    }

    #[test]
    fn test_notification_record_counts_listings() {
        let listings = vec![
            Listing::new("Studio X", "€900", "Delft", "", "https://x"),
            Listing::new("Loft Y", "€1200", "Delft", "", "https://y"),
        ];
        let record = NotificationRecord::new(&listings);
        assert_eq!(record.count, 2);
        assert_eq!(record.listings, listings);
    }
}
