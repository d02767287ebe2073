//! Per-download progress accounting
//!
//! Every in-flight transfer gets its own bar under one shared
//! `MultiProgress`. The byte counter is kept here as well so callers can
//! read it back regardless of whether bars are drawn.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "  {spinner:.blue} {wide_msg} [{bar:30.white/dim}] {bytes}/{total_bytes} {bytes_per_sec}";
const SPINNER_TEMPLATE: &str = "  {spinner:.blue} {wide_msg} {bytes} {bytes_per_sec}";

/// Truncate long names so bars stay on one line
fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let head: String = name.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Shared progress display for all downloads of a run
#[derive(Clone)]
pub struct ProgressBoard {
    multi: MultiProgress,
}

impl ProgressBoard {
    /// Creates a board; `visible = false` keeps the accounting but draws nothing
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
        }
    }

    /// Starts tracking one transfer; `total` of 0 means unknown length
    pub fn start(&self, name: &str, total: u64) -> TransferProgress {
        let bar = if total > 0 {
            let bar = self.multi.add(ProgressBar::new(total));
            if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("=>-"));
            }
            bar
        } else {
            let bar = self.multi.add(ProgressBar::new_spinner());
            if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
                bar.set_style(style);
            }
            bar
        };
        bar.set_message(truncate_name(name, 40));
        bar.enable_steady_tick(Duration::from_millis(100));

        TransferProgress {
            bar,
            name: name.to_string(),
            downloaded: 0,
            total,
        }
    }
}

/// Progress of a single transfer
pub struct TransferProgress {
    bar: ProgressBar,
    name: String,
    downloaded: u64,
    total: u64,
}

impl TransferProgress {
    /// Records `bytes` more received
    pub fn advance(&mut self, bytes: u64) {
        self.downloaded += bytes;
        self.bar.inc(bytes);
        tracing::trace!(
            "{}: {:.2}/{:.2} MB ({:.2}%)",
            self.name,
            self.downloaded as f64 / (1024.0 * 1024.0),
            self.total as f64 / (1024.0 * 1024.0),
            self.percent()
        );
    }

    /// Bytes received so far
    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// Declared length, 0 when unknown
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completion percentage; 0 while the total is unknown
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.downloaded as f64 / self.total as f64 * 100.0
        }
    }

    /// Removes the bar from the board
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
