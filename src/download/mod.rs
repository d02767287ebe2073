//! Download module: item resolution and archive transfer
//!
//! This module handles:
//! - Resolving item pages to direct asset links
//! - Deriving archive file names and extensions
//! - Reserving, streaming, and finalizing archive files
//! - Progress accounting for in-flight transfers
//! - The bounded worker pool that dispatches items

mod engine;
mod naming;
mod pool;
mod progress;

pub use engine::{sweep_partials, DownloadEngine, DownloadOutcome, CHUNK_SIZE};
pub use naming::{
    archive_file_name, derive_name, is_navigation_artifact, partial_path, ArchiveKind,
    PARTIAL_SUFFIX,
};
pub use pool::{run_downloads, ItemReport};
pub use progress::{ProgressBoard, TransferProgress};
