use crate::error::DispatchError;
use crate::models::{Listing, NotificationRecord};
use crate::notify::NotificationChannel;
use crate::storage::NotificationLog;
use async_trait::async_trait;
use tracing::info;

/// Keeps a local backup of every batch in the notification log
pub struct LocalLogNotifier {
    log: NotificationLog,
}

impl LocalLogNotifier {
    pub fn new(log: NotificationLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl NotificationChannel for LocalLogNotifier {
    async fn deliver(&self, listings: &[Listing]) -> Result<(), DispatchError> {
        let entries = self.log.append(NotificationRecord::new(listings)).await?;
        info!(
            path = %self.log.path().display(),
            entries,
            "Saved {} new listings to notification log",
            listings.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local-log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_appends_record() {
        let dir = tempfile::tempdir().unwrap();
        let log = NotificationLog::new(dir.path().join("notifications.json"));
        let notifier = LocalLogNotifier::new(log.clone());

        let listings = vec![
            Listing::new("Studio X", "€900", "Delft", "", "https://x"),
            Listing::new("Loft Y", "€1200", "Delft", "", "https://y"),
        ];
        notifier.deliver(&listings).await.unwrap();

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[0].listings, listings);
    }

    #[tokio::test]
    async fn test_unwritable_log_fails() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = LocalLogNotifier::new(NotificationLog::new(dir.path()));

        let listings = vec![Listing::new("Studio X", "€900", "Delft", "", "https://x")];
        assert!(matches!(
            notifier.deliver(&listings).await,
            Err(DispatchError::Store(_))
        ));
    }
}
