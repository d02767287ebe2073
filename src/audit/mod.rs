//! Integrity auditor for stored archives
//!
//! Scans one directory (top level only), verifies every non-empty `.cbz`
//! and `.cbr` file with its format's reader, and deletes the files that are
//! confirmed corrupt. A file that merely could not be checked, because of
//! a permission problem, an I/O error, or an encrypted entry, is kept.

mod cbr;
mod cbz;

use crate::download::ArchiveKind;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why an archive failed verification
#[derive(Debug, Error)]
pub enum AuditError {
    /// The container is damaged; the file is deleted
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    /// Verification was impossible for unrelated reasons; the file is kept
    #[error("could not verify archive: {0}")]
    Unverifiable(String),
}

/// Maps an I/O error hit while reading archive contents
///
/// The file has already been opened at this point, so a failure is damage
/// to the archive (short reads, invalid or undecodable data, checksum
/// mismatches) unless it is an OS-level condition such as a permission or
/// device problem, which says nothing about the archive.
pub fn classify_io(error: std::io::Error) -> AuditError {
    match error.kind() {
        ErrorKind::PermissionDenied
        | ErrorKind::NotFound
        | ErrorKind::Interrupted
        | ErrorKind::WouldBlock
        | ErrorKind::TimedOut
        | ErrorKind::OutOfMemory
        | ErrorKind::Unsupported => AuditError::Unverifiable(error.to_string()),
        _ => AuditError::Corrupt(error.to_string()),
    }
}

/// Verifies a single archive according to its kind
pub fn verify_archive(path: &Path, kind: ArchiveKind) -> Result<(), AuditError> {
    match kind {
        ArchiveKind::Cbz => cbz::verify(path),
        ArchiveKind::Cbr => cbr::verify(path),
    }
}

/// Audit behavior switches
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditOptions {
    /// Report corrupt files without deleting them
    pub dry_run: bool,
}

/// What an audit found and did
#[derive(Debug, Default)]
pub struct AuditReport {
    /// The directory did not exist
    pub directory_missing: bool,

    /// Archives opened for verification
    pub checked: u64,

    /// Archives that passed verification
    pub valid: u64,

    /// Corrupt archives removed from disk
    pub deleted: Vec<PathBuf>,

    /// Corrupt archives left in place (dry run or failed delete)
    pub corrupt_kept: Vec<PathBuf>,

    /// Archives that could not be verified and were kept
    pub unverifiable: Vec<PathBuf>,

    /// Zero-byte archives that were not opened
    pub skipped_empty: u64,
}

impl AuditReport {
    /// Total number of corrupt archives found
    pub fn corrupt(&self) -> usize {
        self.deleted.len() + self.corrupt_kept.len()
    }
}

/// Audits the archives directly inside `directory`
///
/// A missing directory is reported and yields an empty report; it is not an
/// error. Individual files never abort the audit.
pub fn audit_directory(directory: &Path, options: AuditOptions) -> AuditReport {
    let mut report = AuditReport::default();

    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Directory {} does not exist.", directory.display());
            report.directory_missing = true;
            return report;
        }
        Err(e) => {
            tracing::error!("Cannot read {}: {}", directory.display(), e);
            return report;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(kind) = ArchiveKind::from_file_name(&entry.file_name().to_string_lossy()) else {
            continue;
        };

        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Error checking {}: {}", path.display(), e);
                report.unverifiable.push(path);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        if metadata.len() == 0 {
            tracing::debug!("Skipping empty file {}", path.display());
            report.skipped_empty += 1;
            continue;
        }

        audit_file(path, kind, options, &mut report);
    }

    report
}

fn audit_file(path: PathBuf, kind: ArchiveKind, options: AuditOptions, report: &mut AuditReport) {
    report.checked += 1;

    match verify_archive(&path, kind) {
        Ok(()) => {
            tracing::debug!("OK: {}", path.display());
            report.valid += 1;
        }
        Err(AuditError::Unverifiable(reason)) => {
            tracing::warn!("Error checking {}: {}", path.display(), reason);
            report.unverifiable.push(path);
        }
        Err(AuditError::Corrupt(reason)) => {
            let label = kind.extension().to_uppercase();
            if options.dry_run {
                tracing::info!("Corrupted {} file (dry run, kept): {} ({})", label, path.display(), reason);
                report.corrupt_kept.push(path);
                return;
            }

            tracing::info!("Deleting corrupted {} file: {} ({})", label, path.display(), reason);
            match std::fs::remove_file(&path) {
                Ok(()) => report.deleted.push(path),
                Err(e) => {
                    tracing::error!("Failed to delete {}: {}", path.display(), e);
                    report.corrupt_kept.push(path);
                }
            }
        }
    }
}
