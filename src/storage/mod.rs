//! JSON files that carry state between runs.
//!
//! There is no locking and no atomic rename: a single process owns these
//! files. Running two watchers against the same paths can leave a reader
//! with a half-written file.

mod notification_log;
mod seen;

pub use notification_log::{NotificationLog, MAX_NOTIFICATIONS};
pub use seen::SeenSetStore;

use crate::error::StoreError;
use std::path::Path;
use tracing::warn;

/// Write `contents` to `path`, overwriting it. If the first write fails the
/// parent directory is (re)created and the write is tried once more.
pub(crate) async fn write_with_retry(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let first = match tokio::fs::write(path, contents).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    warn!(
        path = %path.display(),
        error = %first,
        "Write failed, recreating parent directory and retrying"
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("nested").join("file.json");

        write_with_retry(&path, b"[]").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_write_to_directory_fails_after_retry() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_with_retry(dir.path(), b"[]").await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
