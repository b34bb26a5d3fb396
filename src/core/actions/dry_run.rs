//! Strategy that only reports what it would do.

use super::{ActionKind, ActionResource, ImageFile, ResolutionStrategy};
use crate::error::ActionError;
use crate::i18n::{Localizer, MessageArgs};
use std::sync::Arc;
use tracing::info;

/// Logs each duplicate and leaves the filesystem alone
pub struct DryRunStrategy {
    localizer: Arc<dyn Localizer>,
}

impl DryRunStrategy {
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self { localizer }
    }
}

impl ResolutionStrategy for DryRunStrategy {
    fn execute(&self, keep: &ImageFile, remove: &ImageFile) -> Result<(), ActionError> {
        info!(
            "{}",
            self.localizer.translate(
                "DryRunWouldMoveFile",
                &MessageArgs::new()
                    .with("Source", remove.path.display())
                    .with("Destination", keep.path.display())
            )
        );
        Ok(())
    }

    fn resources(&self) -> Option<&dyn ActionResource> {
        None
    }

    fn kind(&self) -> ActionKind {
        ActionKind::DryRun
    }
}
