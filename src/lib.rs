//! # Image Deduplicator
//!
//! Finds visually duplicate images in a folder tree and resolves each group
//! with a pluggable action.
//!
//! ## How It Works
//! - Files are bucketed by exact size, so only same-size files get decoded
//! - Candidates are fingerprinted on a worker pool (dHash by default)
//! - Fingerprints within a Hamming distance threshold form groups
//! - One file per group is kept; the rest go to the chosen action
//!   (a dry run by default, or a move into a trash directory)
//!
//! ## Architecture
//! - `core` - The deduplication engine and its replaceable components
//! - `config` - Run configuration (defaults, TOML file, validation)
//! - `events` - Event-driven progress reporting
//! - `i18n` - Localized log and terminal messages
//! - `logging` - Console and log-file tracing setup
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod i18n;
pub mod logging;

// Re-export commonly used types at the crate root
pub use config::DedupConfig;
pub use error::{DedupError, Result};
pub use logging::init_tracing;
