//! # Core Module
//!
//! The UI-agnostic deduplication engine.
//!
//! ## Modules
//! - `fs` - Filesystem capability every component reads and writes through
//! - `scanner` - Buckets candidate files by exact size
//! - `hasher` - Computes perceptual fingerprints on a worker pool
//! - `comparator` - Groups fingerprints within a distance threshold
//! - `keep` - Picks the survivor of each group
//! - `actions` - Dry-run and move-to-trash strategies
//! - `pipeline` - Orchestrates the full workflow

pub mod actions;
pub mod cancel;
pub mod comparator;
pub mod fs;
pub mod hasher;
pub mod keep;
pub mod pipeline;
pub mod scanner;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use actions::{ActionKind, ImageFile, ResolutionStrategy};
pub use cancel::CancellationToken;
pub use comparator::DuplicateGroup;
pub use hasher::{Fingerprint, HashAlgorithmKind, HashRecord};
pub use keep::{KeepDecision, KeepPolicy};
pub use pipeline::Pipeline;
pub use scanner::FileGroup;
