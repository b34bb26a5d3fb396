//! # Config Module
//!
//! Run configuration for a deduplication pass.
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults ([`DedupConfig::default`])
//! 2. A TOML file (`--config`, or `<config dir>/image-deduplicator/config.toml`)
//! 3. Command-line flags
//!
//! ```toml
//! source = "/photos"
//! extensions = ["jpg", "jpeg", "png"]
//! threshold = 4
//! workers = 8
//! keep = "shortest-path"
//! action = "move-to-trash"
//! trash_dir = "/photos/.trash"
//! algorithm = "difference"
//! language = "de"
//! log_file = "/photos/deduplicator.log"
//! ```

use crate::core::actions::ActionKind;
use crate::core::hasher::{resolve_workers, HashAlgorithmKind, FINGERPRINT_BITS};
use crate::core::keep::KeepPolicy;
use crate::core::scanner::ExtensionFilter;
use crate::error::ConfigError;
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest meaningful distance threshold
pub const MAX_THRESHOLD: u32 = FINGERPRINT_BITS;

/// Name of the default trash directory inside the source
pub const DEFAULT_TRASH_DIR: &str = ".trash";

/// Configuration for one deduplication run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Root directory to scan
    pub source: PathBuf,
    /// Allowed file extensions (case-insensitive, leading dot optional)
    pub extensions: Vec<String>,
    /// Inclusive Hamming distance threshold
    pub threshold: u32,
    /// Hashing workers; zero or negative means one per CPU
    pub workers: i64,
    /// Which file of a group survives
    pub keep: KeepPolicy,
    /// What happens to the rest
    pub action: ActionKind,
    /// Trash location; defaults to `<source>/.trash`
    pub trash_dir: Option<PathBuf>,
    /// Fingerprint algorithm
    pub algorithm: HashAlgorithmKind,
    /// Language for log and terminal messages
    pub language: Language,
    /// Append warnings and errors of each run to this file
    pub log_file: Option<PathBuf>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
            ],
            threshold: 1,
            workers: 0,
            keep: KeepPolicy::default(),
            action: ActionKind::default(),
            trash_dir: None,
            algorithm: HashAlgorithmKind::default(),
            language: Language::default(),
            log_file: None,
        }
    }
}

impl DedupConfig {
    /// Defaults with the given source directory
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Load a TOML config file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("image-deduplicator").join("config.toml"))
    }

    /// Load the per-user config file if there is one, else defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::MissingSource);
        }
        if self.extension_filter().is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        if self.threshold > MAX_THRESHOLD {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
                max: MAX_THRESHOLD,
            });
        }
        Ok(())
    }

    /// Trash directory to use
    pub fn trash_dir(&self) -> PathBuf {
        self.trash_dir
            .clone()
            .unwrap_or_else(|| self.source.join(DEFAULT_TRASH_DIR))
    }

    /// Worker count with the CPU default applied
    pub fn effective_workers(&self) -> usize {
        resolve_workers(self.workers)
    }

    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.extensions)
    }
}
