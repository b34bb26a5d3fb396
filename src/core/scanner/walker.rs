//! Size-bucketing scanner built on the [`FileSystem`] walk.

use super::{filter::ExtensionFilter, CandidateScanner, FileGroup};
use crate::core::fs::FileSystem;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use crate::i18n::{Localizer, MessageArgs};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scanner that buckets accepted files by exact byte size
pub struct SizeScanner {
    fs: Arc<dyn FileSystem>,
    filter: ExtensionFilter,
    localizer: Arc<dyn Localizer>,
    excluded: Vec<PathBuf>,
}

impl SizeScanner {
    /// Create a new scanner
    pub fn new(
        fs: Arc<dyn FileSystem>,
        filter: ExtensionFilter,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            fs,
            filter,
            localizer,
            excluded: Vec::new(),
        }
    }

    /// Skip everything below `dir` (used for a trash directory inside the source)
    pub fn with_excluded_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded.push(dir.into());
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|dir| path.starts_with(dir))
    }
}

impl CandidateScanner for SizeScanner {
    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<FileGroup, ScanError> {
        info!(
            root = %root.display(),
            "{}",
            self.localizer.translate(
                "ScanningForFiles",
                &MessageArgs::new().with("Root", root.display())
            )
        );
        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut by_size: HashMap<u64, Vec<PathBuf>> = HashMap::new();
        let mut files_seen = 0usize;
        let mut files_accepted = 0usize;

        let walked = self.fs.walk(root, &mut |entry| match entry {
            Ok(entry) => {
                if !entry.is_file || entry.size == 0 || self.is_excluded(&entry.path) {
                    return;
                }
                files_seen += 1;

                if !self.filter.should_include(&entry.path) {
                    return;
                }
                files_accepted += 1;

                events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    files_seen,
                    files_accepted,
                    current_path: entry.path.clone(),
                })));
                by_size.entry(entry.size).or_default().push(entry.path);
            }
            Err(err) => {
                let path = err.path.clone().unwrap_or_default();
                let error = if err.source.kind() == io::ErrorKind::PermissionDenied {
                    ScanError::PermissionDenied { path: path.clone() }
                } else {
                    ScanError::Entry {
                        path: path.clone(),
                        reason: err.source.to_string(),
                    }
                };

                warn!(
                    "{}",
                    self.localizer.translate(
                        "ErrorAccessingPath",
                        &MessageArgs::new()
                            .with("FilePath", path.display())
                            .with("Error", &error)
                    )
                );
                events.send(Event::Scan(ScanEvent::Error {
                    path,
                    message: error.to_string(),
                }));
            }
        });

        if let Err(source) = walked {
            return Err(ScanError::RootWalk {
                path: root.to_path_buf(),
                source,
            });
        }

        let group = FileGroup::from_buckets(by_size.into_values());

        debug!(
            files_seen,
            files_accepted,
            candidates = group.candidate_count(),
            "Scan finished"
        );
        info!(
            "{}",
            self.localizer.translate(
                "PotentialDuplicateGroupsFound",
                &MessageArgs::new().with("Count", group.len())
            )
        );
        events.send(Event::Scan(ScanEvent::Completed {
            size_buckets: group.len(),
            candidates: group.candidate_count(),
        }));

        Ok(group)
    }
}
