//! Output module for run summaries
//!
//! This module handles:
//! - Accumulating per-run download statistics
//! - Printing the harvest and audit summaries

pub mod stats;

pub use stats::{print_audit_report, print_summary, RunSummary};
