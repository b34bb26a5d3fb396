//! # Pipeline Module
//!
//! Orchestrates a full deduplication run.
//!
//! ## Pipeline Stages
//! 1. **Setup** - Prepare the strategy's resource (e.g. create the trash dir)
//! 2. **Scan** - Bucket candidate files by exact size
//! 3. **Hash** - Fingerprint every candidate on a worker pool
//! 4. **Group** - Cluster fingerprints within the distance threshold
//! 5. **Resolve** - Keep one file per group, hand the rest to the strategy
//! 6. **Teardown** - Release the resource, even if a stage failed
//!
//! Per-file problems (unreadable entries, undecodable images, failed
//! moves) are logged and skipped. Stage-level failures abort the run.

mod executor;

pub use executor::{Pipeline, PipelineComponents};
