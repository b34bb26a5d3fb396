//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the deduplication pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Hashing phase events
    Hash(HashEvent),
    /// Grouping phase events
    Group(GroupEvent),
    /// Resolution phase events
    Action(ActionEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// An entry could not be read but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed {
        size_buckets: usize,
        candidates: usize,
    },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of regular files looked at so far
    pub files_seen: usize,
    /// Number of files that passed the extension filter
    pub files_accepted: usize,
    /// Entry currently being looked at
    pub current_path: PathBuf,
}

/// Events during the hashing phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Hashing has started
    Started { total_files: usize, workers: usize },
    /// Progress update during hashing
    Progress(HashProgress),
    /// A file could not be hashed and was dropped
    Error { path: PathBuf, message: String },
    /// Hashing completed
    Completed { total_hashed: usize, failed: usize },
}

/// Progress information during hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Number of files finished (hashed or failed) so far
    pub completed: usize,
    /// Total number of files to hash
    pub total: usize,
    /// File that just finished
    pub current_path: PathBuf,
}

/// Events during the grouping phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupEvent {
    /// Grouping has started
    Started { total_records: usize },
    /// A duplicate group was committed
    GroupFound { size: usize },
    /// Grouping completed
    Completed { total_groups: usize },
}

/// Events during the resolution phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionEvent {
    /// A keep/remove decision was made for a group
    Decided { keep: PathBuf, remove_count: usize },
    /// The strategy handled one duplicate
    Executed { keep: PathBuf, removed: PathBuf },
    /// The strategy failed on one duplicate; the run continues
    Failed { path: PathBuf, message: String },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: RunSummary },
    /// Pipeline was cancelled
    Cancelled,
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Setup,
    Scanning,
    Hashing,
    Grouping,
    Resolving,
    Teardown,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files that survived the size pre-filter
    pub candidates: usize,
    /// Files that were fingerprinted successfully
    pub hashed: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Files handed to the strategy for removal without error
    pub files_removed: usize,
    /// Files the strategy failed on
    pub failed_actions: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Setup => write!(f, "Preparing"),
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Hashing => write!(f, "Hashing"),
            PipelinePhase::Grouping => write!(f, "Grouping"),
            PipelinePhase::Resolving => write!(f, "Resolving"),
            PipelinePhase::Teardown => write!(f, "Cleaning up"),
        }
    }
}
