use crate::audit::AuditError;
use std::fs::File;
use std::path::Path;
use unrar::error::{Code, UnrarError};
use unrar::Archive;

/// Verifies a RAR-family archive with the unrar test routine
pub fn verify(path: &Path) -> Result<(), AuditError> {
    // Surface permission and I/O problems before the C library sees the file
    File::open(path).map_err(|e| AuditError::Unverifiable(e.to_string()))?;

    let mut archive = Archive::new(path)
        .open_for_processing()
        .map_err(classify_unrar)?;

    while let Some(header) = archive.read_header().map_err(classify_unrar)? {
        archive = if header.entry().is_file() {
            header.test().map_err(classify_unrar)?
        } else {
            header.skip().map_err(classify_unrar)?
        };
    }

    Ok(())
}

fn classify_unrar(error: UnrarError) -> AuditError {
    match error.code {
        Code::BadData | Code::BadArchive | Code::UnknownFormat => {
            AuditError::Corrupt(error.to_string())
        }
        _ => AuditError::Unverifiable(error.to_string()),
    }
}
