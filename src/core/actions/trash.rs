//! Strategy that moves duplicates into a trash directory.

use super::{ActionKind, ActionResource, ImageFile, ResolutionStrategy};
use crate::core::fs::FileSystem;
use crate::error::ActionError;
use crate::i18n::{Localizer, MessageArgs};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Permission bits for a newly created trash directory
const TRASH_DIR_MODE: u32 = 0o755;

/// Trash directory created on setup. Nothing to release on teardown.
pub struct TrashDirectory {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
    localizer: Arc<dyn Localizer>,
}

impl TrashDirectory {
    pub fn new(fs: Arc<dyn FileSystem>, dir: PathBuf, localizer: Arc<dyn Localizer>) -> Self {
        Self { fs, dir, localizer }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ActionResource for TrashDirectory {
    fn setup(&self) -> Result<(), ActionError> {
        info!(
            "{}",
            self.localizer.translate(
                "MoveToTrashSetup",
                &MessageArgs::new().with("Dir", self.dir.display())
            )
        );

        self.fs
            .create_dir_all(&self.dir, TRASH_DIR_MODE)
            .map_err(|source| ActionError::Setup {
                resource: format!("trash directory {}", self.dir.display()),
                source,
            })
    }

    fn teardown(&self) -> Result<(), ActionError> {
        Ok(())
    }
}

/// Moves each duplicate to `<trash>/<nanos>_<file name>`
pub struct MoveToTrashStrategy {
    fs: Arc<dyn FileSystem>,
    trash: TrashDirectory,
    localizer: Arc<dyn Localizer>,
    last_stamp: AtomicU64,
}

impl MoveToTrashStrategy {
    pub fn new(fs: Arc<dyn FileSystem>, trash_dir: PathBuf, localizer: Arc<dyn Localizer>) -> Self {
        Self {
            trash: TrashDirectory::new(fs.clone(), trash_dir, localizer.clone()),
            fs,
            localizer,
            last_stamp: AtomicU64::new(0),
        }
    }

    pub fn trash_dir(&self) -> &Path {
        self.trash.dir()
    }

    /// Current time in nanoseconds, strictly increasing across calls
    fn next_stamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        now.max(previous + 1)
    }

    /// Destination for `path` inside the trash directory
    fn trash_target(&self, path: &Path) -> Result<PathBuf, ActionError> {
        let file_name = path.file_name().ok_or_else(|| ActionError::NoFileName {
            path: path.to_path_buf(),
        })?;

        Ok(self.trash.dir().join(format!(
            "{}_{}",
            self.next_stamp(),
            file_name.to_string_lossy()
        )))
    }
}

impl ResolutionStrategy for MoveToTrashStrategy {
    fn execute(&self, _keep: &ImageFile, remove: &ImageFile) -> Result<(), ActionError> {
        let target = self.trash_target(&remove.path)?;

        info!(
            "{}",
            self.localizer.translate(
                "MovingFile",
                &MessageArgs::new()
                    .with("From", remove.path.display())
                    .with("To", target.display())
            )
        );

        self.fs
            .rename(&remove.path, &target)
            .map_err(|source| ActionError::Move {
                from: remove.path.clone(),
                to: target,
                source,
            })
    }

    fn resources(&self) -> Option<&dyn ActionResource> {
        Some(&self.trash)
    }

    fn kind(&self) -> ActionKind {
        ActionKind::MoveToTrash
    }
}
