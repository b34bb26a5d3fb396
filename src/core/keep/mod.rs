//! # Keep Module
//!
//! Decides which file of a duplicate group survives.
//!
//! ## Policies
//! - **oldest** - earliest modification time wins; files that cannot be
//!   stat'ed count as the epoch
//! - **shortest-path** - fewest characters in the full path wins
//!
//! Ties keep the earlier path in group order. Every input path ends up in
//! exactly one of `keep` or `remove`.

use crate::core::fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Which file of a group to keep and which to remove
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepDecision {
    /// Survivor (empty path when the group was empty)
    pub keep: PathBuf,
    /// Everything else, in group order
    pub remove: Vec<PathBuf>,
}

/// Trait for keep policies
pub trait KeepSelector: Send + Sync {
    /// Split a group into a survivor and the files to remove
    fn select(&self, paths: &[PathBuf]) -> KeepDecision;
}

/// Available keep policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepPolicy {
    #[default]
    Oldest,
    ShortestPath,
}

impl KeepPolicy {
    /// Build the selector for this policy
    pub fn build(self, fs: Arc<dyn FileSystem>) -> Box<dyn KeepSelector> {
        match self {
            KeepPolicy::Oldest => Box::new(OldestFile::new(fs)),
            KeepPolicy::ShortestPath => Box::new(ShortestPath),
        }
    }
}

impl std::fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeepPolicy::Oldest => write!(f, "oldest"),
            KeepPolicy::ShortestPath => write!(f, "shortest-path"),
        }
    }
}

/// Single pass: a strictly better candidate replaces the current survivor,
/// which moves to the remove list
fn select_by<K, F>(paths: &[PathBuf], mut key: F) -> KeepDecision
where
    K: PartialOrd,
    F: FnMut(&PathBuf) -> K,
{
    let mut iter = paths.iter();
    let Some(first) = iter.next() else {
        return KeepDecision::default();
    };

    let mut keep = first.clone();
    let mut best = key(first);
    let mut remove = Vec::with_capacity(paths.len().saturating_sub(1));

    for path in iter {
        let candidate = key(path);
        if candidate < best {
            remove.push(std::mem::replace(&mut keep, path.clone()));
            best = candidate;
        } else {
            remove.push(path.clone());
        }
    }

    KeepDecision { keep, remove }
}

/// Keep the file with the earliest modification time
pub struct OldestFile {
    fs: Arc<dyn FileSystem>,
}

impl OldestFile {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn modified(&self, path: &Path) -> SystemTime {
        match self.fs.stat(path) {
            Ok(stat) => stat.modified,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Stat failed, treating as epoch");
                SystemTime::UNIX_EPOCH
            }
        }
    }
}

impl KeepSelector for OldestFile {
    fn select(&self, paths: &[PathBuf]) -> KeepDecision {
        select_by(paths, |p| self.modified(p))
    }
}

/// Keep the file whose full path has the fewest characters
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestPath;

impl KeepSelector for ShortestPath {
    fn select(&self, paths: &[PathBuf]) -> KeepDecision {
        select_by(paths, |p| p.to_string_lossy().chars().count())
    }
}
