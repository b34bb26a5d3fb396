//! # Scanner Module
//!
//! Finds candidate image files and buckets them by exact byte size.
//!
//! Two files can only be duplicates if they share a size, so only buckets
//! with at least two members leave the scanner. This is a cheap pre-filter
//! before any image gets decoded.
//!
//! ## Filtering
//! - Regular files only (directories and symlinked dirs are not followed)
//! - Non-empty files only
//! - Extension must be in the allowed set (case-insensitive)
//!
//! ## Example
//! ```rust,ignore
//! use image_deduplicator::core::scanner::{CandidateScanner, ExtensionFilter, SizeScanner};
//!
//! let scanner = SizeScanner::new(fs, ExtensionFilter::new(["jpg", "png"]), localizer);
//! let groups = scanner.scan(Path::new("/photos"))?;
//! let candidates = groups.flatten();
//! ```

mod filter;
mod walker;

pub use filter::ExtensionFilter;
pub use walker::SizeScanner;

use crate::error::ScanError;
use crate::events::{null_sender, EventSender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Candidate paths bucketed by identical byte size.
///
/// Every bucket holds at least two paths; bucket order and the order of
/// paths inside a bucket are not meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileGroup {
    buckets: Vec<Vec<PathBuf>>,
}

impl FileGroup {
    /// Build from raw buckets, dropping any with fewer than two paths
    pub fn from_buckets(buckets: impl IntoIterator<Item = Vec<PathBuf>>) -> Self {
        Self {
            buckets: buckets.into_iter().filter(|b| b.len() >= 2).collect(),
        }
    }

    pub fn buckets(&self) -> &[Vec<PathBuf>] {
        &self.buckets
    }

    /// Number of size buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of paths across all buckets
    pub fn candidate_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Concatenate every bucket into one candidate list
    pub fn flatten(&self) -> Vec<PathBuf> {
        self.buckets.iter().flatten().cloned().collect()
    }
}

/// Trait for candidate scanners
///
/// Implement this trait to plug in a different pre-filter (or a fake in tests).
pub trait CandidateScanner: Send + Sync {
    /// Walk `root` and return same-size candidate buckets
    fn scan(&self, root: &Path) -> Result<FileGroup, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    /// Scan with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<FileGroup, ScanError>;
}
