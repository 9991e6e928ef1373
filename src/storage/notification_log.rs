use crate::error::StoreError;
use crate::models::NotificationRecord;
use crate::storage::write_with_retry;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Entries kept in the notification log; older ones are evicted first
pub const MAX_NOTIFICATIONS: usize = 50;

/// Append-only log of delivered notification batches
#[derive(Debug, Clone)]
pub struct NotificationLog {
    path: PathBuf,
}

impl NotificationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, oldest first. A missing or unreadable log is empty.
    pub async fn entries(&self) -> Vec<NotificationRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No existing notifications file, creating new one");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error reading notifications, starting new log");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed notifications file, starting new log");
                Vec::new()
            }
        }
    }

    /// Append `record`, keeping only the newest entries. Returns the log length.
    pub async fn append(&self, record: NotificationRecord) -> Result<usize, StoreError> {
        let mut entries = self.entries().await;
        entries.push(record);

        if entries.len() > MAX_NOTIFICATIONS {
            let excess = entries.len() - MAX_NOTIFICATIONS;
            entries.drain(..excess);
            info!("Trimmed notifications to last {} entries", MAX_NOTIFICATIONS);
        }

        let json =
            serde_json::to_vec_pretty(&entries).map_err(|e| StoreError::json(&self.path, e))?;
        write_with_retry(&self.path, &json).await?;

        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;

    fn record(title: &str) -> NotificationRecord {
        NotificationRecord::new(&[Listing::new(title, "€900", "Delft", "2 kamers", "https://x")])
    }

    #[tokio::test]
    async fn test_append_to_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = NotificationLog::new(dir.path().join("notifications.json"));

        assert_eq!(log.append(record("first")).await.unwrap(), 1);
        assert_eq!(log.append(record("second")).await.unwrap(), 2);

        let entries = log.entries().await;
        assert_eq!(entries[0].listings[0].title, "first");
        assert_eq!(entries[1].listings[0].title, "second");
        assert_eq!(entries[1].count, 1);
    }

    #[tokio::test]
    async fn test_log_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let log = NotificationLog::new(dir.path().join("notifications.json"));

        for i in 0..MAX_NOTIFICATIONS {
            log.append(record(&format!("listing {i}"))).await.unwrap();
        }
        assert_eq!(log.entries().await.len(), MAX_NOTIFICATIONS);

        let len = log.append(record("listing 50")).await.unwrap();
        assert_eq!(len, MAX_NOTIFICATIONS);

        let entries = log.entries().await;
        assert_eq!(entries.len(), MAX_NOTIFICATIONS);
        assert_eq!(entries[0].listings[0].title, "listing 1");
        assert_eq!(entries[MAX_NOTIFICATIONS - 1].listings[0].title, "listing 50");
    }

    #[tokio::test]
    async fn test_corrupt_log_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");
        std::fs::write(&path, "not json at all").unwrap();

        let log = NotificationLog::new(&path);
        assert!(log.entries().await.is_empty());
        assert_eq!(log.append(record("fresh")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keeps_non_ascii_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");
        let log = NotificationLog::new(&path);

        log.append(record("Appartement Wijnhaven")).await.unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("€900"));
    }
}
