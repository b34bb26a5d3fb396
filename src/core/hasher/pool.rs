//! Bounded worker pool that fingerprints candidate files in parallel.
//!
//! Jobs, results and per-file errors each travel over a crossbeam channel
//! sized to the number of inputs, so neither the producer nor the workers
//! ever block on a full queue. A collector drains both output channels with
//! `select!` until every worker has dropped its senders.

use super::decode::FastDecoder;
use super::traits::{FingerprintAlgorithm, HashRecord};
use super::PerceptualHasher;
use crate::core::cancel::CancellationToken;
use crate::core::fs::FileSystem;
use crate::error::HashError;
use crate::events::{Event, EventSender, HashEvent, HashProgress};
use crate::i18n::{Localizer, MessageArgs};
use crossbeam_channel::{bounded, never, select, Receiver, Sender};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Number of workers to use when none is configured
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Map a configured worker count to a usable one (non-positive means default)
pub fn resolve_workers(requested: i64) -> usize {
    if requested <= 0 {
        default_workers()
    } else {
        requested as usize
    }
}

/// [`PerceptualHasher`] backed by a fixed pool of scoped threads
pub struct WorkerPoolHasher {
    workers: usize,
    fs: Arc<dyn FileSystem>,
    algorithm: Box<dyn FingerprintAlgorithm>,
    localizer: Arc<dyn Localizer>,
    cancel: CancellationToken,
}

impl WorkerPoolHasher {
    pub fn new(
        workers: usize,
        fs: Arc<dyn FileSystem>,
        algorithm: Box<dyn FingerprintAlgorithm>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            workers: workers.max(1),
            fs,
            algorithm,
            localizer,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the pool
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Read, decode and fingerprint one file
    fn hash_one(&self, path: &Path) -> Result<HashRecord, HashError> {
        let mut reader = self.fs.open(path).map_err(|source| HashError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| HashError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let image = FastDecoder::decode(path, bytes)?;
        let fingerprint = self
            .algorithm
            .fingerprint(&image)
            .map_err(|e| attach_path(e, path))?;

        debug!(path = %path.display(), hash = %fingerprint.to_hex(), "Fingerprinted");

        Ok(HashRecord {
            path: path.to_path_buf(),
            fingerprint,
        })
    }

    fn work(
        &self,
        jobs: Receiver<&Path>,
        results: Sender<HashRecord>,
        errors: Sender<HashError>,
        events: &EventSender,
        completed: &AtomicUsize,
        total: usize,
    ) {
        for path in jobs.iter() {
            if self.cancel.is_cancelled() {
                break;
            }

            match self.hash_one(path) {
                Ok(record) => {
                    let _ = results.send(record);
                }
                Err(error) => {
                    warn!(
                        "{}",
                        self.localizer.translate(
                            "PHashError",
                            &MessageArgs::new()
                                .with("Path", path.display())
                                .with("Error", &error)
                        )
                    );
                    events.send(Event::Hash(HashEvent::Error {
                        path: path.to_path_buf(),
                        message: error.to_string(),
                    }));
                    let _ = errors.send(error);
                }
            }

            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            events.send(Event::Hash(HashEvent::Progress(HashProgress {
                completed: done,
                total,
                current_path: path.to_path_buf(),
            })));
        }
    }

    /// Drain both output channels until every worker has finished
    fn collect(
        results: Receiver<HashRecord>,
        errors: Receiver<HashError>,
        capacity: usize,
    ) -> (Vec<HashRecord>, usize) {
        let mut records = Vec::with_capacity(capacity);
        let mut failed = 0usize;
        let mut results_open = true;
        let mut errors_open = true;
        let closed_results: Receiver<HashRecord> = never();
        let closed_errors: Receiver<HashError> = never();

        while results_open || errors_open {
            let results_rx = if results_open { &results } else { &closed_results };
            let errors_rx = if errors_open { &errors } else { &closed_errors };

            select! {
                recv(results_rx) -> msg => match msg {
                    Ok(record) => records.push(record),
                    Err(_) => results_open = false,
                },
                recv(errors_rx) -> msg => match msg {
                    Ok(_) => failed += 1,
                    Err(_) => errors_open = false,
                },
            }
        }

        (records, failed)
    }
}

impl PerceptualHasher for WorkerPoolHasher {
    fn hash_files_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<Vec<HashRecord>, HashError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let total = paths.len();
        let workers = self.workers.min(total);

        info!(
            "{}",
            self.localizer.translate(
                "HashingStarted",
                &MessageArgs::new().with("Count", total).with("Workers", workers)
            )
        );
        events.send(Event::Hash(HashEvent::Started {
            total_files: total,
            workers,
        }));

        let (job_tx, job_rx) = bounded::<&Path>(total);
        for path in paths {
            // Capacity equals the job count, so this never blocks
            let _ = job_tx.send(path.as_path());
        }
        drop(job_tx);

        let (result_tx, result_rx) = bounded(total);
        let (error_tx, error_rx) = bounded(total);
        let completed = AtomicUsize::new(0);

        let (records, failed) = thread::scope(|scope| {
            for _ in 0..workers {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let errors = error_tx.clone();
                let completed = &completed;
                scope.spawn(move || self.work(jobs, results, errors, events, completed, total));
            }
            drop(result_tx);
            drop(error_tx);

            Self::collect(result_rx, error_rx, total)
        });

        if self.cancel.is_cancelled() {
            return Err(HashError::Cancelled);
        }

        info!(
            "{}",
            self.localizer.translate(
                "HashingFinished",
                &MessageArgs::new().with("Count", records.len()).with("Failed", failed)
            )
        );
        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: records.len(),
            failed,
        }));

        Ok(records)
    }
}

fn attach_path(error: HashError, path: &Path) -> HashError {
    match error {
        HashError::EmptyImage { .. } => HashError::EmptyImage {
            path: path.to_path_buf(),
        },
        HashError::Decode { reason, .. } => HashError::Decode {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::DifferenceHasher;
    use crate::core::testing::FakeFileSystem;
    use crate::events::EventChannel;
    use crate::i18n::Catalog;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(seed: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(32, 32, |x, y| {
            let v = ((x * seed + y * 7) % 256) as u8;
            Rgb([v, v, v])
        }));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn hasher(fs: Arc<FakeFileSystem>, workers: usize) -> WorkerPoolHasher {
        WorkerPoolHasher::new(
            workers,
            fs,
            Box::new(DifferenceHasher::new(8)),
            Arc::new(Catalog::default()),
        )
    }

    fn photo_set(fs: &FakeFileSystem, count: u32) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = PathBuf::from(format!("/photos/{}.png", i));
                fs.add_file(&path, &png_bytes(i % 5 + 1));
                path
            })
            .collect()
    }

    #[test]
    fn empty_input_returns_empty_output() {
        let fs = Arc::new(FakeFileSystem::new());
        let records = hasher(fs, 4).hash_files(&[]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn hashes_every_readable_file() {
        let fs = Arc::new(FakeFileSystem::new());
        let paths = photo_set(&fs, 6);

        let records = hasher(fs, 3).hash_files(&paths).unwrap();

        assert_eq!(records.len(), 6);
        for record in &records {
            assert!(paths.contains(&record.path));
            assert_eq!(record.fingerprint.bit_count(), 64);
        }
    }

    #[test]
    fn unreadable_and_corrupt_files_are_dropped() {
        let fs = Arc::new(FakeFileSystem::new());
        let mut paths = photo_set(&fs, 3);
        fs.add_file("/photos/corrupt.png", b"definitely not a png");
        fs.fail_open("/photos/locked.png");
        paths.push(PathBuf::from("/photos/corrupt.png"));
        paths.push(PathBuf::from("/photos/locked.png"));

        let (sender, receiver) = EventChannel::new();
        let records = hasher(fs, 2).hash_files_with_events(&paths, &sender).unwrap();
        drop(sender);

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.path != Path::new("/photos/corrupt.png")));

        let failed = receiver
            .iter()
            .find_map(|e| match e {
                Event::Hash(HashEvent::Completed { failed, .. }) => Some(failed),
                _ => None,
            })
            .unwrap();
        assert_eq!(failed, 2);
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let fs = Arc::new(FakeFileSystem::new());
        let paths = photo_set(&fs, 12);

        let mut single = hasher(fs.clone(), 1).hash_files(&paths).unwrap();
        let mut many = hasher(fs, 8).hash_files(&paths).unwrap();

        single.sort_by(|a, b| a.path.cmp(&b.path));
        many.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(single, many);
    }

    #[test]
    fn more_workers_than_files_is_fine() {
        let fs = Arc::new(FakeFileSystem::new());
        let paths = photo_set(&fs, 2);

        let records = hasher(fs, 64).hash_files(&paths).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn cancelled_pool_reports_cancellation() {
        let fs = Arc::new(FakeFileSystem::new());
        let paths = photo_set(&fs, 4);
        let token = CancellationToken::new();
        token.cancel();

        let result = hasher(fs, 2).with_cancellation(token).hash_files(&paths);
        assert!(matches!(result, Err(HashError::Cancelled)));
    }

    #[test]
    fn resolve_workers_defaults_non_positive_values() {
        assert_eq!(resolve_workers(3), 3);
        assert_eq!(resolve_workers(0), default_workers());
        assert_eq!(resolve_workers(-2), default_workers());
        assert!(default_workers() >= 1);
    }
}
