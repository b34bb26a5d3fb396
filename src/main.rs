//! # image-dedup CLI
//!
//! Command-line interface for the image deduplicator.
//!
//! ## Usage
//! ```bash
//! image-dedup dedup ~/Photos
//! image-dedup dedup ~/Photos --action move-to-trash --keep shortest-path
//! image-dedup dedup ~/Photos --output json
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
