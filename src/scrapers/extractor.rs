use crate::models::{Listing, DETAILS_PLACEHOLDER, LOCATION_PLACEHOLDER, PRICE_PLACEHOLDER};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

const CONTAINER_SELECTOR: &str = "li.search-list__item";
const TITLE_LINK_SELECTOR: &str = "a.listing-search-item__link";
const PRICE_SELECTOR: &str = "div.listing-search-item__price";
const LOCATION_SELECTOR: &str = "div.listing-search-item__location";
const DETAILS_SELECTOR: &str = "div.listing-search-item__details";

/// Why a listing container produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no title link element")]
    MissingTitleLink,
    #[error("title link has no text")]
    EmptyTitle,
    #[error("title link has no href")]
    MissingHref,
    #[error("cannot resolve link {0:?}")]
    UnresolvableLink(String),
}

/// Outcome of extracting a single listing container
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Listing(Listing),
    Skipped(SkipReason),
}

/// Turns a search results page into listings.
///
/// Every container is handled on its own: a broken container becomes
/// `Extraction::Skipped` and never affects its siblings.
pub struct ListingExtractor {
    origin: Url,
    container: Selector,
    title_link: Selector,
    price: Selector,
    location: Selector,
    details: Selector,
}

impl ListingExtractor {
    pub fn new(site_origin: &str) -> Result<Self> {
        let origin = Url::parse(site_origin)
            .with_context(|| format!("Invalid site origin {site_origin:?}"))?;

        Ok(Self {
            origin,
            container: selector(CONTAINER_SELECTOR)?,
            title_link: selector(TITLE_LINK_SELECTOR)?,
            price: selector(PRICE_SELECTOR)?,
            location: selector(LOCATION_SELECTOR)?,
            details: selector(DETAILS_SELECTOR)?,
        })
    }

    /// One outcome per container, in document order
    pub fn extract(&self, html: &str) -> Vec<Extraction> {
        let document = Html::parse_document(html);
        let observed_at = Utc::now();

        document
            .select(&self.container)
            .map(|container| match self.extract_container(container, observed_at) {
                Ok(listing) => Extraction::Listing(listing),
                Err(reason) => Extraction::Skipped(reason),
            })
            .collect()
    }

    /// Listings found on the page, in document order. Duplicates are kept.
    pub fn listings(&self, html: &str) -> Vec<Listing> {
        let outcomes = self.extract(html);
        let containers = outcomes.len();

        let listings: Vec<Listing> = outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(idx, outcome)| match outcome {
                Extraction::Listing(listing) => Some(listing),
                Extraction::Skipped(reason) => {
                    warn!(container = idx, %reason, "Skipped listing container");
                    None
                }
            })
            .collect();

        info!(
            "Found {} listings in {} containers",
            listings.len(),
            containers
        );
        listings
    }

    fn extract_container(
        &self,
        container: ElementRef<'_>,
        observed_at: DateTime<Utc>,
    ) -> Result<Listing, SkipReason> {
        let anchor = container
            .select(&self.title_link)
            .next()
            .ok_or(SkipReason::MissingTitleLink)?;

        let title = element_text(anchor);
        if title.is_empty() {
            return Err(SkipReason::EmptyTitle);
        }

        let href = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or(SkipReason::MissingHref)?;
        let link = self.absolute_link(href)?;

        let price = self.field_text(container, &self.price, PRICE_PLACEHOLDER);
        let location = self.field_text(container, &self.location, LOCATION_PLACEHOLDER);
        let details = self.field_text(container, &self.details, DETAILS_PLACEHOLDER);

        debug!("Extracted listing: {} ({})", title, link);

        Ok(Listing::observed_at(
            title,
            price,
            location,
            details,
            link,
            observed_at,
        ))
    }

    fn absolute_link(&self, href: &str) -> Result<String, SkipReason> {
        if href.starts_with("http") {
            return Ok(href.to_string());
        }
        self.origin
            .join(href)
            .map(String::from)
            .map_err(|_| SkipReason::UnresolvableLink(href.to_string()))
    }

    fn field_text(&self, container: ElementRef<'_>, selector: &Selector, placeholder: &str) -> String {
        container
            .select(selector)
            .next()
            .map(element_text)
            .unwrap_or_else(|| placeholder.to_string())
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {css:?}: {e:?}"))
}

/// Text nodes of an element, each trimmed, joined without separator
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
