//! # Actions Module
//!
//! What happens to each duplicate once a group has been resolved.
//!
//! ## Strategies
//! - **dry-run** - logs what would happen, touches nothing
//! - **move-to-trash** - renames the duplicate into a trash directory as
//!   `<nanosecond timestamp>_<file name>`
//!
//! A strategy may own an [`ActionResource`] (the trash directory, say).
//! The pipeline sets it up once before scanning and tears it down once
//! after resolution, whatever happened in between.
//!
//! ## Example
//! ```rust,ignore
//! let factory = default_factory(fs, trash_dir, localizer);
//! let strategy = factory(ActionKind::MoveToTrash);
//! if let Some(resource) = strategy.resources() {
//!     resource.setup()?;
//! }
//! strategy.execute(&ImageFile::new(keep), &ImageFile::new(duplicate))?;
//! ```

mod dry_run;
mod trash;

pub use dry_run::DryRunStrategy;
pub use trash::{MoveToTrashStrategy, TrashDirectory};

use crate::core::fs::FileSystem;
use crate::error::ActionError;
use crate::i18n::Localizer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file handed to a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Something a strategy needs prepared before use and released after
pub trait ActionResource: Send + Sync {
    fn setup(&self) -> Result<(), ActionError>;

    fn teardown(&self) -> Result<(), ActionError>;
}

/// Trait for resolution strategies
pub trait ResolutionStrategy: Send + Sync {
    /// Apply the strategy to one duplicate of `keep`
    fn execute(&self, keep: &ImageFile, remove: &ImageFile) -> Result<(), ActionError>;

    /// Resource to set up before the run, if any
    fn resources(&self) -> Option<&dyn ActionResource>;

    fn kind(&self) -> ActionKind;
}

/// Available resolution strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    #[default]
    DryRun,
    MoveToTrash,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::DryRun => write!(f, "dry-run"),
            ActionKind::MoveToTrash => write!(f, "move-to-trash"),
        }
    }
}

/// Builds the strategy for an action kind
pub type StrategyFactory = Box<dyn Fn(ActionKind) -> Box<dyn ResolutionStrategy> + Send + Sync>;

/// Factory wiring the built-in strategies to a filesystem and trash location
pub fn default_factory(
    fs: Arc<dyn FileSystem>,
    trash_dir: PathBuf,
    localizer: Arc<dyn Localizer>,
) -> StrategyFactory {
    Box::new(move |kind| -> Box<dyn ResolutionStrategy> {
        match kind {
            ActionKind::DryRun => Box::new(DryRunStrategy::new(localizer.clone())),
            ActionKind::MoveToTrash => Box::new(MoveToTrashStrategy::new(
                fs.clone(),
                trash_dir.clone(),
                localizer.clone(),
            )),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeFileSystem;
    use crate::i18n::Catalog;

    #[test]
    fn factory_builds_requested_kind() {
        let factory = default_factory(
            Arc::new(FakeFileSystem::new()),
            PathBuf::from("/photos/.trash"),
            Arc::new(Catalog::default()),
        );

        let dry = factory(ActionKind::DryRun);
        let trash = factory(ActionKind::MoveToTrash);

        assert_eq!(dry.kind(), ActionKind::DryRun);
        assert!(dry.resources().is_none());
        assert_eq!(trash.kind(), ActionKind::MoveToTrash);
        assert!(trash.resources().is_some());
    }

    #[test]
    fn kind_round_trips_through_serde() {
        let json = serde_json::to_string(&ActionKind::MoveToTrash).unwrap();
        assert_eq!(json, "\"move-to-trash\"");
        let back: ActionKind = serde_json::from_str("\"dry-run\"").unwrap();
        assert_eq!(back, ActionKind::DryRun);
    }
}
