use crate::error::StoreError;
use crate::storage::write_with_retry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    #[serde(default)]
    seen_ids: BTreeSet<String>,
}

/// Persisted set of listing ids from the last completed scan
#[derive(Debug, Clone)]
pub struct SeenSetStore {
    path: PathBuf,
}

impl SeenSetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the seen set.
    ///
    /// A missing file is the first-run state and yields an empty set. An
    /// unreadable or corrupt file also yields an empty set, so a damaged
    /// file causes extra notifications rather than silently missing listings.
    pub async fn load(&self) -> BTreeSet<String> {
        match self.try_load().await {
            Ok(Some(ids)) => {
                debug!(path = %self.path.display(), count = ids.len(), "Loaded seen listings");
                ids
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No previous listings file found, starting fresh");
                BTreeSet::new()
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error loading seen listings, treating as empty");
                BTreeSet::new()
            }
        }
    }

    /// `Ok(None)` when the file does not exist
    pub async fn try_load(&self) -> Result<Option<BTreeSet<String>>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let file: SeenFile =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&self.path, e))?;
        Ok(Some(file.seen_ids))
    }

    /// Replace the persisted set with `ids`.
    ///
    /// Failures are logged and swallowed; returns whether the set was written.
    pub async fn save(&self, ids: &BTreeSet<String>) -> bool {
        match self.try_save(ids).await {
            Ok(()) => {
                debug!(path = %self.path.display(), count = ids.len(), "Saved seen listings");
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error saving seen listings");
                false
            }
        }
    }

    pub async fn try_save(&self, ids: &BTreeSet<String>) -> Result<(), StoreError> {
        let file = SeenFile {
            seen_ids: ids.clone(),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(|e| StoreError::json(&self.path, e))?;
        write_with_retry(&self.path, &json).await
    }
}
