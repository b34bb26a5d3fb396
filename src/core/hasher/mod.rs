//! # Hasher Module
//!
//! Computes perceptual fingerprints for candidate images.
//!
//! ## Supported Algorithms
//! - **dHash (Difference Hash)** - Default, best balance of speed and accuracy
//! - **aHash (Average Hash)** - Fastest, good for exact duplicates
//! - **pHash (Perceptual Hash)** - Most robust, handles edits well
//!
//! All three produce 64-bit fingerprints compared by Hamming distance.
//!
//! ## Failure Handling
//! A file that cannot be opened, decoded or fingerprinted is logged and
//! dropped. Only cancellation fails the whole batch.
//!
//! ## Example
//! ```rust,ignore
//! use image_deduplicator::core::hasher::{build_algorithm, HashAlgorithmKind, WorkerPoolHasher};
//!
//! let hasher = WorkerPoolHasher::new(
//!     8,
//!     fs,
//!     build_algorithm(HashAlgorithmKind::Difference),
//!     localizer,
//! );
//! let records = hasher.hash_files(&candidates)?;
//! ```

mod algorithms;
pub mod decode;
mod pool;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, DctHasher};
pub use pool::{default_workers, resolve_workers, WorkerPoolHasher};
pub use traits::{
    Fingerprint, FingerprintAlgorithm, HashAlgorithmKind, HashRecord, FINGERPRINT_BITS,
};

use crate::error::HashError;
use crate::events::{null_sender, EventSender};
use std::path::PathBuf;

/// Grid edge used by every algorithm (8x8 = 64 bits)
pub const HASH_SIZE: u32 = 8;

/// Build the fingerprint algorithm for a kind
pub fn build_algorithm(kind: HashAlgorithmKind) -> Box<dyn FingerprintAlgorithm> {
    match kind {
        HashAlgorithmKind::Average => Box::new(AverageHasher::new(HASH_SIZE)),
        HashAlgorithmKind::Difference => Box::new(DifferenceHasher::new(HASH_SIZE)),
        HashAlgorithmKind::Perceptual => Box::new(DctHasher::new(HASH_SIZE)),
    }
}

/// Turns a list of paths into fingerprint records.
///
/// Output order is unspecified. Every record's path comes from the input,
/// and files that fail are simply absent.
pub trait PerceptualHasher: Send + Sync {
    /// Fingerprint `paths`
    fn hash_files(&self, paths: &[PathBuf]) -> Result<Vec<HashRecord>, HashError> {
        self.hash_files_with_events(paths, &null_sender())
    }

    /// Fingerprint with progress reporting via events
    fn hash_files_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<Vec<HashRecord>, HashError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_algorithm_matches_kind() {
        for kind in [
            HashAlgorithmKind::Average,
            HashAlgorithmKind::Difference,
            HashAlgorithmKind::Perceptual,
        ] {
            assert_eq!(build_algorithm(kind).kind(), kind);
        }
    }

    #[test]
    fn default_algorithm_is_dhash() {
        assert_eq!(HashAlgorithmKind::default(), HashAlgorithmKind::Difference);
    }
}
