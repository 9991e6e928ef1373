//! Subscriber setup for the binary: console output plus an append-only log
//! file. Library modules only emit events.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{warn, Subscriber};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILE: &str = "listing_watch.log";

/// RUST_LOG wins over the command line flags when set
pub fn env_filter(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("listing_watch=info,warn"),
                1 => EnvFilter::new("listing_watch=debug,info"),
                _ => EnvFilter::new("trace"),
            }
        }
    })
}

/// Open `path` for appending, creating it and its parent directory if needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn subscriber(filter: EnvFilter, log_file: Option<File>) -> impl Subscriber + Send + Sync {
    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
}

/// Install the global subscriber. A log file that cannot be opened is
/// reported and skipped; the console output still works.
pub fn init(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut open_error = None;
    let file = match log_file {
        Some(path) => match open_log_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                open_error = Some((path, e));
                None
            }
        },
        None => None,
    };

    subscriber(env_filter(verbose, quiet), file).try_init()?;

    if let Some((path, e)) = open_error {
        warn!(path = %path.display(), error = %e, "Unable to open log file, logging to the console only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_reach_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join(DEFAULT_LOG_FILE);
        let file = open_log_file(&path).unwrap();

        tracing::subscriber::with_default(subscriber(EnvFilter::new("info"), Some(file)), || {
            tracing::info!(id = "studio_x_delft_€900", "New listing: Studio X");
            tracing::debug!("below the filter");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("New listing: Studio X"));
        assert!(contents.contains("studio_x_delft_€900"));
        assert!(!contents.contains("below the filter"));
        // Plain text, no colour codes
        assert!(!contents.contains('\u{1b}'));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_LOG_FILE);
        fs::write(&path, "earlier run\n").unwrap();

        let file = open_log_file(&path).unwrap();
        tracing::subscriber::with_default(subscriber(EnvFilter::new("info"), Some(file)), || {
            tracing::warn!("second run");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier run\n"));
        assert!(contents.contains("second run"));
    }

    #[test]
    fn test_open_log_file_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log_file(dir.path()).is_err());
    }
}
