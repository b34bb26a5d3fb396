//! Pipeline execution implementation.

use crate::config::DedupConfig;
use crate::core::actions::{
    default_factory, ActionKind, ActionResource, ImageFile, ResolutionStrategy, StrategyFactory,
};
use crate::core::cancel::CancellationToken;
use crate::core::comparator::{DuplicateGroup, DuplicateGrouper, GreedyGrouper};
use crate::core::fs::{FileSystem, StdFileSystem};
use crate::core::hasher::{build_algorithm, PerceptualHasher, WorkerPoolHasher};
use crate::core::keep::KeepSelector;
use crate::core::scanner::{CandidateScanner, SizeScanner};
use crate::error::{CompareError, ConfigError, DedupError, HashError};
use crate::events::{
    null_sender, ActionEvent, Event, EventSender, PipelineEvent, PipelinePhase, RunSummary,
};
use crate::i18n::{Catalog, Localizer, MessageArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// The replaceable parts of a pipeline
pub struct PipelineComponents {
    pub scanner: Box<dyn CandidateScanner>,
    pub hasher: Box<dyn PerceptualHasher>,
    pub grouper: Box<dyn DuplicateGrouper>,
    pub keep: Box<dyn KeepSelector>,
    pub strategies: StrategyFactory,
    pub localizer: Arc<dyn Localizer>,
}

/// Runs scan, hash, group and resolve for one source directory
pub struct Pipeline {
    source: PathBuf,
    action: ActionKind,
    components: PipelineComponents,
    /// Strategy built for the last action used
    strategy: Option<(ActionKind, Arc<dyn ResolutionStrategy>)>,
    cancel: CancellationToken,
}

impl Pipeline {
    /// Create a pipeline from validated config and explicit components
    pub fn new(config: &DedupConfig, components: PipelineComponents) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            source: config.source.clone(),
            action: config.action,
            components,
            strategy: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Create a pipeline wired to the real filesystem
    pub fn from_config(config: &DedupConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_cancellation(config, CancellationToken::new())
    }

    /// Like [`Pipeline::from_config`], with a token shared by every stage
    pub fn from_config_with_cancellation(
        config: &DedupConfig,
        cancel: CancellationToken,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        // Walked paths must share a prefix with the trash dir for exclusion
        let config = &DedupConfig {
            source: resolve_path(&config.source),
            trash_dir: Some(resolve_path(&config.trash_dir())),
            ..config.clone()
        };

        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem::new());
        let localizer: Arc<dyn Localizer> = Arc::new(Catalog::new(config.language));
        let trash_dir = config.trash_dir();

        let components = PipelineComponents {
            scanner: Box::new(
                SizeScanner::new(fs.clone(), config.extension_filter(), localizer.clone())
                    .with_excluded_dir(trash_dir.clone()),
            ),
            hasher: Box::new(
                WorkerPoolHasher::new(
                    config.effective_workers(),
                    fs.clone(),
                    build_algorithm(config.algorithm),
                    localizer.clone(),
                )
                .with_cancellation(cancel.clone()),
            ),
            grouper: Box::new(
                GreedyGrouper::new(config.threshold, localizer.clone())
                    .with_cancellation(cancel.clone()),
            ),
            keep: config.keep.build(fs.clone()),
            strategies: default_factory(fs, trash_dir, localizer.clone()),
            localizer,
        };

        Ok(Self::new(config, components)?.with_cancellation(cancel))
    }

    /// Check this token between duplicate groups
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    /// Switch the action used by the next run
    pub fn select_action(&mut self, action: ActionKind) {
        self.action = action;
    }

    /// Run the pipeline without events
    pub fn run(&mut self) -> Result<RunSummary, DedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&mut self, events: &EventSender) -> Result<RunSummary, DedupError> {
        let start_time = Instant::now();
        events.send(Event::Pipeline(PipelineEvent::Started));

        let strategy = self.strategy();
        let result = match strategy.resources() {
            Some(resource) => self.run_with_resource(resource, strategy.as_ref(), events),
            None => self.run_stages(strategy.as_ref(), events),
        };

        match result {
            Ok(mut summary) => {
                summary.duration_ms = start_time.elapsed().as_millis() as u64;
                events.send(Event::Pipeline(PipelineEvent::Completed {
                    summary: summary.clone(),
                }));
                Ok(summary)
            }
            Err(DedupError::Cancelled) => {
                info!("{}", self.translate("RunCancelled", MessageArgs::new()));
                events.send(Event::Pipeline(PipelineEvent::Cancelled));
                Err(DedupError::Cancelled)
            }
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                Err(e)
            }
        }
    }

    /// Strategy for the current action, built on first use
    fn strategy(&mut self) -> Arc<dyn ResolutionStrategy> {
        if let Some((kind, strategy)) = &self.strategy {
            if *kind == self.action {
                return strategy.clone();
            }
        }

        let strategy: Arc<dyn ResolutionStrategy> =
            Arc::from((self.components.strategies)(self.action));
        self.strategy = Some((self.action, strategy.clone()));
        strategy
    }

    fn run_with_resource(
        &self,
        resource: &dyn ActionResource,
        strategy: &dyn ResolutionStrategy,
        events: &EventSender,
    ) -> Result<RunSummary, DedupError> {
        self.phase(events, PipelinePhase::Setup);
        if let Err(e) = resource.setup() {
            error!(
                "{}",
                self.translate("ActionStrategyError", MessageArgs::new().with("Error", &e))
            );
            return Err(e.into());
        }

        let _teardown = TeardownGuard {
            resource,
            pipeline: self,
            events,
        };
        self.run_stages(strategy, events)
    }

    fn run_stages(
        &self,
        strategy: &dyn ResolutionStrategy,
        events: &EventSender,
    ) -> Result<RunSummary, DedupError> {
        self.phase(events, PipelinePhase::Scanning);
        let file_group = self
            .components
            .scanner
            .scan_with_events(&self.source, events)?;
        let candidates = file_group.flatten();

        self.phase(events, PipelinePhase::Hashing);
        let records = self
            .components
            .hasher
            .hash_files_with_events(&candidates, events)
            .map_err(|e| match e {
                HashError::Cancelled => DedupError::Cancelled,
                other => other.into(),
            })?;

        self.phase(events, PipelinePhase::Grouping);
        let groups = self
            .components
            .grouper
            .group_with_events(&records, events)
            .map_err(|e| match e {
                CompareError::Cancelled => DedupError::Cancelled,
            })?;

        self.phase(events, PipelinePhase::Resolving);
        let mut summary = RunSummary {
            candidates: candidates.len(),
            hashed: records.len(),
            duplicate_groups: groups.len(),
            ..RunSummary::default()
        };
        self.resolve(&groups, strategy, events, &mut summary)?;

        if groups.is_empty() {
            info!("{}", self.translate("SummaryNoDuplicates", MessageArgs::new()));
        } else {
            info!(
                "{}",
                self.translate(
                    "SummaryDuplicatesFound",
                    MessageArgs::new()
                        .with("Groups", summary.duplicate_groups)
                        .with("Files", summary.files_removed)
                )
            );
        }

        Ok(summary)
    }

    /// Pick a survivor per group and hand every other member to the strategy
    fn resolve(
        &self,
        groups: &[DuplicateGroup],
        strategy: &dyn ResolutionStrategy,
        events: &EventSender,
        summary: &mut RunSummary,
    ) -> Result<(), DedupError> {
        for group in groups {
            if self.cancel.is_cancelled() {
                return Err(DedupError::Cancelled);
            }

            let decision = self.components.keep.select(&group.paths);
            info!(
                "{}",
                self.translate(
                    "DuplicateGroupFound",
                    MessageArgs::new()
                        .with("ToKeep", decision.keep.display())
                        .with("ToRemoveCount", decision.remove.len())
                )
            );
            events.send(Event::Action(ActionEvent::Decided {
                keep: decision.keep.clone(),
                remove_count: decision.remove.len(),
            }));

            let keep = ImageFile::new(decision.keep.clone());
            for path in &decision.remove {
                match strategy.execute(&keep, &ImageFile::new(path.clone())) {
                    Ok(()) => {
                        summary.files_removed += 1;
                        events.send(Event::Action(ActionEvent::Executed {
                            keep: decision.keep.clone(),
                            removed: path.clone(),
                        }));
                    }
                    Err(e) => {
                        summary.failed_actions += 1;
                        warn!(
                            "{}",
                            self.translate(
                                "ActionFailed",
                                MessageArgs::new()
                                    .with("Keep", decision.keep.display())
                                    .with("Remove", path.display())
                                    .with("Error", &e)
                            )
                        );
                        events.send(Event::Action(ActionEvent::Failed {
                            path: path.clone(),
                            message: e.to_string(),
                        }));
                    }
                }
            }
        }

        Ok(())
    }

    fn phase(&self, events: &EventSender, phase: PipelinePhase) {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
    }

    fn translate(&self, id: &str, args: MessageArgs) -> String {
        self.components.localizer.translate(id, &args)
    }
}

/// Absolute, symlink-free form of `path`. A missing tail is appended to its
/// resolved parent, since the trash dir may not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            resolve_path(parent).join(name)
        }
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Tears the strategy's resource down when the run leaves scope, on any path
struct TeardownGuard<'a> {
    resource: &'a dyn ActionResource,
    pipeline: &'a Pipeline,
    events: &'a EventSender,
}

impl Drop for TeardownGuard<'_> {
    fn drop(&mut self) {
        self.pipeline.phase(self.events, PipelinePhase::Teardown);
        if let Err(e) = self.resource.teardown() {
            warn!(
                "{}",
                self.pipeline
                    .translate("TeardownFailed", MessageArgs::new().with("Error", &e))
            );
        }
    }
}
