use crate::audit::{classify_io, AuditError};
use std::fs::File;
use std::io;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Verifies a ZIP-family archive by reading every entry to the end
///
/// Reading an entry to completion checks its CRC, which makes this the
/// equivalent of a full container test.
pub fn verify(path: &Path) -> Result<(), AuditError> {
    let file = File::open(path).map_err(|e| AuditError::Unverifiable(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(classify_zip)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(classify_zip)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        io::copy(&mut entry, &mut io::sink()).map_err(|e| match classify_io(e) {
            AuditError::Corrupt(reason) => AuditError::Corrupt(format!("{}: {}", name, reason)),
            other => other,
        })?;
    }

    Ok(())
}

fn classify_zip(error: ZipError) -> AuditError {
    match error {
        ZipError::Io(e) => classify_io(e),
        ZipError::InvalidArchive(reason) => AuditError::Corrupt(reason.to_string()),
        ZipError::FileNotFound => AuditError::Corrupt("entry missing from archive".to_string()),
        other => AuditError::Unverifiable(other.to_string()),
    }
}
