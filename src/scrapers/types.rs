use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_URL: &str =
    "https://www.pararius.nl/huurwoningen/delft/0-1500/straal-10/2-slaapkamers";
pub const DEFAULT_SITE_ORIGIN: &str = "https://www.pararius.nl";

/// The search results page to watch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Full search URL, filters included
    pub url: String,
    /// Origin that relative listing links are resolved against
    pub site_origin: String,
}

impl Default for SearchTarget {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARGET_URL.to_string(),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
        }
    }
}
