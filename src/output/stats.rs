//! Run statistics for harvests and audits
//!
//! This module accumulates what happened during a run and prints the final
//! summary that every run ends with, whatever failed along the way.

use crate::audit::AuditReport;
use crate::download::{DownloadOutcome, ItemReport};
use chrono::{DateTime, Local};

/// Counters for one harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Local>,

    /// When the run finished (set by `finish`)
    pub finished_at: Option<DateTime<Local>>,

    /// Category pages scanned
    pub pages_fetched: u64,

    /// Category pages dropped after a failed fetch
    pub pages_failed: u64,

    /// Distinct item links discovered
    pub items_found: u64,

    /// Items dropped before dispatch because the inventory knows them
    pub known_in_inventory: u64,

    /// Archives written by this run
    pub downloaded: u64,

    /// Bytes written by this run
    pub bytes_downloaded: u64,

    /// Items whose destination already existed
    pub already_present: u64,

    /// Items skipped because another worker held the same file
    pub in_progress: u64,

    /// Comment anchors and similar non-comic links
    pub navigation_artifacts: u64,

    /// Item pages without a download link
    pub missing_asset_link: u64,

    /// Page or asset fetch failures
    pub fetch_failed: u64,

    /// Transfers that broke off
    pub stream_failed: u64,

    /// Item URLs no file name could be derived from
    pub unnamed: u64,

    /// Download tasks that panicked
    pub tasks_failed: u64,

    /// Leftover partial files removed at startup
    pub partials_swept: u64,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    /// Starts a summary stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            pages_fetched: 0,
            pages_failed: 0,
            items_found: 0,
            known_in_inventory: 0,
            downloaded: 0,
            bytes_downloaded: 0,
            already_present: 0,
            in_progress: 0,
            navigation_artifacts: 0,
            missing_asset_link: 0,
            fetch_failed: 0,
            stream_failed: 0,
            unnamed: 0,
            tasks_failed: 0,
            partials_swept: 0,
        }
    }

    /// Records the outcome of one item
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            DownloadOutcome::AlreadyPresent { .. } => self.already_present += 1,
            DownloadOutcome::InProgress { .. } => self.in_progress += 1,
            DownloadOutcome::NavigationArtifact { .. } => self.navigation_artifacts += 1,
            DownloadOutcome::MissingAssetLink => self.missing_asset_link += 1,
            DownloadOutcome::FetchFailed(_) => self.fetch_failed += 1,
            DownloadOutcome::StreamFailed { .. } => self.stream_failed += 1,
            DownloadOutcome::Unnamed => self.unnamed += 1,
        }
    }

    /// Records every report of a finished pool
    pub fn record_all(&mut self, reports: &[ItemReport]) {
        for report in reports {
            self.record(&report.outcome);
        }
    }

    /// Items that ended in a failure
    pub fn failures(&self) -> u64 {
        self.missing_asset_link
            + self.fetch_failed
            + self.stream_failed
            + self.unnamed
            + self.tasks_failed
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Elapsed seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the harvest summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Catalog:");
    println!("  Pages scanned: {}", summary.pages_fetched);
    println!("  Pages failed: {}", summary.pages_failed);
    println!("  Comics found: {}", summary.items_found);
    println!("  Known from inventory: {}", summary.known_in_inventory);
    println!();

    println!("Downloads:");
    println!(
        "  Downloaded: {} ({:.2} MB)",
        summary.downloaded,
        summary.bytes_downloaded as f64 / (1024.0 * 1024.0)
    );
    println!("  Already present: {}", summary.already_present);
    println!("  Skipped (same file in flight): {}", summary.in_progress);
    println!("  Skipped (comment links): {}", summary.navigation_artifacts);
    if summary.partials_swept > 0 {
        println!("  Incomplete prior attempts removed: {}", summary.partials_swept);
    }
    println!();

    if summary.failures() > 0 {
        println!("Failures:");
        println!("  No download link: {}", summary.missing_asset_link);
        println!("  Fetch errors: {}", summary.fetch_failed);
        println!("  Transfer errors: {}", summary.stream_failed);
        println!("  No usable file name: {}", summary.unnamed);
        println!("  Task failures: {}", summary.tasks_failed);
        println!();
    }

    println!("All comics processed!");
}

/// Prints the audit summary to stdout
pub fn print_audit_report(report: &AuditReport) {
    println!("=== Audit Summary ===\n");

    println!("  Checked: {}", report.checked);
    println!("  Valid: {}", report.valid);
    println!("  Corrupt: {}", report.corrupt());
    println!("  Deleted: {}", report.deleted.len());
    println!("  Skipped (empty): {}", report.skipped_empty);

    if !report.corrupt_kept.is_empty() {
        println!("\nCorrupt but kept ({}):", report.corrupt_kept.len());
        for path in &report.corrupt_kept {
            println!("  - {}", path.display());
        }
    }

    if !report.unverifiable.is_empty() {
        println!("\nCould not verify ({}):", report.unverifiable.len());
        for path in &report.unverifiable {
            println!("  - {}", path.display());
        }
    }

    println!("\nScan complete.");
}
