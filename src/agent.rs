//! Scheduling around the change detector: single runs, the polling loop and
//! the self test.

use crate::config::Config;
use crate::detector::ChangeDetector;
use crate::models::Listing;
use crate::notify::{
    ConsoleNotifier, LocalLogNotifier, NotificationChannel, NotificationDispatcher,
    SendGridNotifier,
};
use crate::scrapers::{ListingExtractor, ParariusScraper, ScraperTrait};
use crate::storage::{NotificationLog, SeenSetStore};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

pub struct Agent<S> {
    detector: ChangeDetector<S>,
    dispatcher: NotificationDispatcher,
    interval: Duration,
}

impl Agent<ParariusScraper> {
    /// Wire up the production components from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let scraper = ParariusScraper::with_target(config.target.clone())?;
        let extractor = ListingExtractor::new(&config.target.site_origin)?;
        let detector = ChangeDetector::new(
            scraper,
            extractor,
            SeenSetStore::new(&config.seen_listings_file),
        );

        let channels: Vec<Box<dyn NotificationChannel>> = vec![
            Box::new(SendGridNotifier::new(config.sendgrid.clone())),
            Box::new(LocalLogNotifier::new(NotificationLog::new(
                &config.notifications_file,
            ))),
            Box::new(ConsoleNotifier::new()),
        ];

        Ok(Self::new(
            detector,
            NotificationDispatcher::new(channels),
            config.interval(),
        ))
    }
}

impl<S: ScraperTrait> Agent<S> {
    pub fn new(
        detector: ChangeDetector<S>,
        dispatcher: NotificationDispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            detector,
            dispatcher,
            interval,
        }
    }

    /// One full cycle: detect new listings and notify about them
    pub async fn check_for_new_listings(&self) -> Vec<Listing> {
        info!("Checking for new apartment listings...");

        let new_listings = self.detector.run().await;
        if new_listings.is_empty() {
            info!("No new listings found");
            return new_listings;
        }

        info!("Found {} new listing(s)!", new_listings.len());
        if self.dispatcher.dispatch(&new_listings).await {
            info!("Notification sent successfully");
        } else {
            error!("Failed to send notification through any channel");
        }

        for listing in &new_listings {
            info!(id = %listing.id, "New listing: {} - {} - {}", listing.title, listing.price, listing.location);
        }
        new_listings
    }

    pub async fn run_once(&self) {
        info!("Running apartment scraper once...");
        self.check_for_new_listings().await;
        info!("Single run completed");
    }

    /// Run a cycle now and then once per interval until `shutdown` turns true.
    ///
    /// Shutdown is only observed between cycles; a cycle in flight always
    /// finishes.
    pub async fn run_continuous(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting apartment scraper agent (checking every {} seconds)",
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            if *shutdown.borrow() {
                break;
            }
            self.check_for_new_listings().await;
        }

        info!("Apartment scraper agent stopped");
    }

    /// Check that the page can be fetched and parsed and that at least one
    /// notification channel works. Does not touch the seen set.
    pub async fn self_test(&self) -> bool {
        info!("Testing apartment scraper components...");

        match self.detector.current_listings().await {
            Ok(listings) => {
                info!("Scraper test successful! Found {} current listings", listings.len());
                if let Some(sample) = listings.first() {
                    info!("Sample listing: {} | {} | {}", sample.title, sample.price, sample.location);
                }
            }
            Err(e) => {
                error!(error = %e, "Scraper test failed");
                return false;
            }
        }

        if !self.dispatcher.self_test().await {
            error!("Notification test failed");
            return false;
        }

        info!("All component tests passed!");
        true
    }
}

/// A receiver that turns true once Ctrl+C (SIGINT) or, on unix, SIGTERM is
/// received. Handlers are installed before this returns.
pub fn shutdown_on_signal() -> std::io::Result<watch::Receiver<bool>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        let received = tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|()| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
        };
        #[cfg(not(unix))]
        let received = tokio::signal::ctrl_c().await.map(|()| "ctrl-c");

        match received {
            Ok(signal) => {
                info!(signal, "Received shutdown signal, stopping after the current cycle");
                // Only fails when the loop is already gone
                tx.send(true).ok();
            }
            Err(e) => {
                warn!(error = %e, "Unable to listen for shutdown signal");
                // Keep the sender alive so the loop is not stopped by a dropped channel
                std::future::pending::<()>().await;
            }
        }
    });

    Ok(rx)
}
