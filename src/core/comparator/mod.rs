//! # Comparator Module
//!
//! Groups fingerprint records into duplicate clusters.
//!
//! ## How It Works
//! Records are visited in input order. Each record that is not yet in a
//! group becomes an anchor and collects every later, still-ungrouped record
//! within the distance threshold of the anchor. Membership is decided by
//! distance to the anchor only, so grouping is not transitive: with
//! `d(A,B) = 3`, `d(B,C) = 3` and `d(A,C) = 6`, threshold 4 gives `{A, B}`
//! and leaves C out.
//!
//! ## Comparison Thresholds
//! | Distance | Meaning               |
//! |----------|-----------------------|
//! | 0        | Same perceptual image |
//! | 1-4      | Near-exact            |
//! | 5-10     | Similar               |

mod grouper;
mod traits;

pub use grouper::GreedyGrouper;
pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::hasher::HashRecord;
use crate::error::CompareError;
use crate::events::{null_sender, EventSender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A group of visually duplicate images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Anchor first, then members in input order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Get the number of duplicates (excluding the one that is kept)
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Trait for duplicate groupers
pub trait DuplicateGrouper: Send + Sync {
    /// Partition `records` into groups of two or more near-identical images
    fn group(&self, records: &[HashRecord]) -> Result<Vec<DuplicateGroup>, CompareError> {
        self.group_with_events(records, &null_sender())
    }

    /// Group with progress reporting via events
    fn group_with_events(
        &self,
        records: &[HashRecord],
        events: &EventSender,
    ) -> Result<Vec<DuplicateGroup>, CompareError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_count_excludes_one_keeper() {
        let group = DuplicateGroup::new(vec!["/a".into(), "/b".into(), "/c".into()]);
        assert_eq!(group.len(), 3);
        assert_eq!(group.duplicate_count(), 2);
    }
}
