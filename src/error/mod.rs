//! # Error Module
//!
//! Error types for the image deduplicator.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Separate fatal from per-item** - only stage-level errors reach the
//!   caller; per-file failures are logged and the run continues

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Run was cancelled")]
    Cancelled,
}

/// Errors that occur while scanning for candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to walk directory {path}: {source}")]
    RootWalk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {reason}")]
    Entry { path: PathBuf, reason: String },
}

/// Errors that occur while fingerprinting images
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to open image file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Cannot compare {left} fingerprint with {right} fingerprint")]
    IncompatibleFingerprints { left: String, right: String },

    #[error("Hashing was cancelled")]
    Cancelled,
}

/// Errors that occur while grouping fingerprints
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Comparison was cancelled")]
    Cancelled,
}

/// Errors raised by resolution strategies and their resources
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Failed to prepare {resource}: {source}")]
    Setup {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path has no file name: {path}")]
    NoFileName { path: PathBuf },
}

/// Errors in the run configuration, reported before any work starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Source directory is required")]
    MissingSource,

    #[error("At least one allowed image extension is required")]
    NoExtensions,

    #[error("Invalid threshold: {value} (must be 0-{max})")]
    InvalidThreshold { value: u32, max: u32 },

    #[error("Unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;
