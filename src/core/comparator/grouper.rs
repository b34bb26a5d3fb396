//! Greedy anchor-based grouping of fingerprint records.

use super::{ComparisonStrategy, DuplicateGroup, DuplicateGrouper, ThresholdStrategy};
use crate::core::cancel::CancellationToken;
use crate::core::hasher::HashRecord;
use crate::error::CompareError;
use crate::events::{Event, EventSender, GroupEvent};
use crate::i18n::{Localizer, MessageArgs};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Groups records by distance to the first ungrouped record (the anchor)
pub struct GreedyGrouper {
    strategy: ThresholdStrategy,
    localizer: Arc<dyn Localizer>,
    cancel: CancellationToken,
}

impl GreedyGrouper {
    /// Create a grouper with an inclusive distance threshold
    pub fn new(threshold: u32, localizer: Arc<dyn Localizer>) -> Self {
        Self {
            strategy: ThresholdStrategy::new(threshold),
            localizer,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the grouper
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn threshold(&self) -> u32 {
        self.strategy.threshold()
    }
}

impl DuplicateGrouper for GreedyGrouper {
    fn group_with_events(
        &self,
        records: &[HashRecord],
        events: &EventSender,
    ) -> Result<Vec<DuplicateGroup>, CompareError> {
        info!(
            "{}",
            self.localizer.translate(
                "GroupingDuplicatesStarted",
                &MessageArgs::new().with("Count", records.len())
            )
        );
        events.send(Event::Group(GroupEvent::Started {
            total_records: records.len(),
        }));

        let mut grouped: HashSet<&Path> = HashSet::new();
        let mut groups = Vec::new();

        for (i, anchor) in records.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(CompareError::Cancelled);
            }
            if grouped.contains(anchor.path.as_path()) {
                continue;
            }

            let mut members: Vec<&HashRecord> = vec![anchor];
            for other in &records[i + 1..] {
                if grouped.contains(other.path.as_path()) {
                    continue;
                }

                match anchor.fingerprint.distance(&other.fingerprint) {
                    Ok(distance) if self.strategy.is_duplicate(distance) => {
                        debug!(
                            anchor = %anchor.path.display(),
                            other = %other.path.display(),
                            distance,
                            "Within threshold"
                        );
                        members.push(other);
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(
                            "{}",
                            self.localizer.translate(
                                "HashCompareError",
                                &MessageArgs::new()
                                    .with("File1", anchor.path.display())
                                    .with("File2", other.path.display())
                                    .with("Error", &error)
                            )
                        );
                    }
                }
            }

            if members.len() >= 2 {
                for member in &members {
                    grouped.insert(member.path.as_path());
                }
                events.send(Event::Group(GroupEvent::GroupFound {
                    size: members.len(),
                }));
                groups.push(DuplicateGroup::new(
                    members.iter().map(|m| m.path.clone()).collect(),
                ));
            }
        }

        info!(
            "{}",
            self.localizer.translate(
                "GroupingDuplicatesFinished",
                &MessageArgs::new().with("Count", groups.len())
            )
        );
        events.send(Event::Group(GroupEvent::Completed {
            total_groups: groups.len(),
        }));

        Ok(groups)
    }
}
