//! Delivery of new listings.
//!
//! Every channel is attempted for every batch; one channel failing never
//! stops the others.

mod console;
mod local;
mod sendgrid;

pub use console::ConsoleNotifier;
pub use local::LocalLogNotifier;
pub use sendgrid::{SendGridNotifier, SendGridSettings, DEFAULT_SENDGRID_API_URL};

use crate::error::DispatchError;
use crate::models::Listing;
use async_trait::async_trait;
use tracing::{info, warn};

/// A single way of telling the user about new listings
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, listings: &[Listing]) -> Result<(), DispatchError>;

    fn name(&self) -> &'static str;
}

pub struct NotificationDispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Send `listings` through every channel.
    ///
    /// Returns true if at least one channel delivered. An empty batch is a
    /// success and touches no channel.
    pub async fn dispatch(&self, listings: &[Listing]) -> bool {
        if listings.is_empty() {
            return true;
        }

        let mut delivered = false;
        for channel in &self.channels {
            match channel.deliver(listings).await {
                Ok(()) => {
                    info!(channel = channel.name(), count = listings.len(), "Notification delivered");
                    delivered = true;
                }
                Err(e) => {
                    warn!(channel = channel.name(), error = %e, "Notification channel failed");
                }
            }
        }
        delivered
    }

    /// Push a synthetic listing through every channel
    pub async fn self_test(&self) -> bool {
        info!("Testing notification system...");
        self.dispatch(&[test_listing()]).await
    }
}

/// Placeholder listing used by the self test
pub fn test_listing() -> Listing {
    Listing::new(
        "Test Apartment Listing",
        "€1,200",
        "Test Location, Delft",
        "Test details - 2 bedrooms, 60m²",
        "https://www.pararius.nl",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Recording {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationChannel for Recording {
        async fn deliver(&self, _listings: &[Listing]) -> Result<(), DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DispatchError::NotConfigured("recording"))
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn dispatcher(outcomes: &[bool]) -> (NotificationDispatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let channels = outcomes
            .iter()
            .map(|ok| {
                Box::new(Recording {
                    calls: calls.clone(),
                    fail: !ok,
                }) as Box<dyn NotificationChannel>
            })
            .collect();
        (NotificationDispatcher::new(channels), calls)
    }

    #[tokio::test]
    async fn test_empty_batch_skips_channels() {
        let (dispatcher, calls) = dispatcher(&[false, false]);
        assert!(dispatcher.dispatch(&[]).await);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_one_success_is_enough() {
        let (dispatcher, calls) = dispatcher(&[false, true, false]);
        assert!(dispatcher.dispatch(&[test_listing()]).await);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_all_failing() {
        let (dispatcher, calls) = dispatcher(&[false, false, false]);
        assert!(!dispatcher.dispatch(&[test_listing()]).await);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_self_test_uses_every_channel() {
        let (dispatcher, calls) = dispatcher(&[true, true]);
        assert!(dispatcher.self_test().await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
