//! Listing watch: polls a rental search page and reports listings that were
//! not there during the previous scan.
//!
//! The pipeline is fetch → extract → fingerprint → diff against the persisted
//! seen set → persist → notify. See [`detector::ChangeDetector`].

pub mod agent;
pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod scrapers;
pub mod storage;

pub use agent::Agent;
pub use config::Config;
pub use detector::ChangeDetector;
pub use error::{ConfigError, DispatchError, FetchError, StoreError};
pub use models::{Listing, NotificationRecord};
