use crate::error::ConfigError;
use crate::notify::{SendGridSettings, DEFAULT_SENDGRID_API_URL};
use crate::scrapers::types::{DEFAULT_SITE_ORIGIN, DEFAULT_TARGET_URL};
use crate::scrapers::SearchTarget;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MINUTES: u64 = 30;
/// One year; longer intervals overflow timer arithmetic
pub const MAX_INTERVAL_MINUTES: u64 = 365 * 24 * 60;
pub const DEFAULT_SEEN_LISTINGS_FILE: &str = "seen_listings.json";
pub const DEFAULT_NOTIFICATIONS_FILE: &str = "notifications.json";

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub target: SearchTarget,
    pub interval_minutes: u64,
    pub seen_listings_file: PathBuf,
    pub notifications_file: PathBuf,
    /// `None` when any SendGrid variable is missing; email is then disabled
    pub sendgrid: Option<SendGridSettings>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let interval_minutes = match var("CHECK_INTERVAL_MINUTES") {
            Some(raw) => parse_interval("CHECK_INTERVAL_MINUTES", &raw)?,
            None => DEFAULT_INTERVAL_MINUTES,
        };

        let sendgrid = match (
            var("SENDGRID_API_KEY"),
            var("SENDGRID_FROM_EMAIL"),
            var("RECIPIENT_EMAIL"),
        ) {
            (Some(api_key), Some(from_email), Some(to_email)) => Some(SendGridSettings {
                api_key,
                from_email,
                to_email,
                api_url: var("SENDGRID_API_URL")
                    .unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            target: SearchTarget {
                url: var("TARGET_URL").unwrap_or_else(|| DEFAULT_TARGET_URL.to_string()),
                site_origin: var("SITE_ORIGIN")
                    .unwrap_or_else(|| DEFAULT_SITE_ORIGIN.to_string()),
            },
            interval_minutes,
            seen_listings_file: var("SEEN_LISTINGS_FILE")
                .unwrap_or_else(|| DEFAULT_SEEN_LISTINGS_FILE.to_string())
                .into(),
            notifications_file: var("NOTIFICATIONS_FILE")
                .unwrap_or_else(|| DEFAULT_NOTIFICATIONS_FILE.to_string())
                .into(),
            sendgrid,
        })
    }

    /// Replace the poll interval, e.g. from the command line
    pub fn with_interval(mut self, minutes: u64) -> Result<Self, ConfigError> {
        self.interval_minutes = check_interval("--interval", minutes, &minutes.to_string())?;
        Ok(self)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.min(MAX_INTERVAL_MINUTES) * 60)
    }
}

fn parse_interval(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let minutes = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
            reason: "must be a whole number of minutes",
        })?;
    check_interval(name, minutes, raw)
}

fn check_interval(name: &'static str, minutes: u64, raw: &str) -> Result<u64, ConfigError> {
    let reason = match minutes {
        0 => "must be at least 1 minute",
        m if m > MAX_INTERVAL_MINUTES => "must be at most one year (525600 minutes)",
        m => return Ok(m),
    };
    Err(ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason,
    })
}
