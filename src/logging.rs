//! # Logging
//!
//! `tracing` output for the binary.
//!
//! Console lines go to stderr. Their level comes from `RUST_LOG` when set,
//! otherwise `info` (`debug` with `--verbose`). With a log file configured,
//! warnings and errors are also appended to it, so per-file hash, decode
//! and move failures are still there after the terminal closes.
//!
//! ```rust,ignore
//! init_tracing(false, Some(Path::new("deduplicator.log")))?;
//! ```

use crate::error::ConfigError;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Lowest level written to the log file
pub const LOG_FILE_LEVEL: LevelFilter = LevelFilter::WARN;

#[cfg(unix)]
const LOG_FILE_MODE: u32 = 0o600;

/// Install the global subscriber. Calling this twice is harmless; the
/// first subscriber stays.
pub fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<(), ConfigError> {
    let default_level = if verbose { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = match log_file {
        Some(path) => Some(file_layer(open_log_file(path)?)),
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file)
        .try_init();

    Ok(())
}

/// Open `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> Result<File, ConfigError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOG_FILE_MODE);
    }

    options.open(path).map_err(|source| ConfigError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Plain-text layer writing [`LOG_FILE_LEVEL`] and above to `file`
pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LOG_FILE_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tracing::{info, warn};

    #[test]
    fn file_layer_keeps_warnings_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let subscriber =
            tracing_subscriber::registry().with(file_layer(open_log_file(&path).unwrap()));

        tracing::subscriber::with_default(subscriber, || {
            info!("routine progress");
            warn!("could not hash /photos/broken.jpg");
        });

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("could not hash /photos/broken.jpg"));
        assert!(text.contains("WARN"));
        assert!(!text.contains("routine progress"));
    }

    #[test]
    fn reopening_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "earlier run\n").unwrap();

        let subscriber =
            tracing_subscriber::registry().with(file_layer(open_log_file(&path).unwrap()));
        tracing::subscriber::with_default(subscriber, || warn!("this run"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier run\n"));
        assert!(text.contains("this run"));
    }

    #[cfg(unix)]
    #[test]
    fn new_log_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        open_log_file(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !LOG_FILE_MODE, 0);
    }

    #[test]
    fn unwritable_location_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("run.log");

        assert!(matches!(
            open_log_file(&path),
            Err(ConfigError::LogFile { .. })
        ));
    }
}
