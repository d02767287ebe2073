//! Integration tests for the archive auditor

use comic_harvester::audit::{audit_directory, AuditOptions};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::FileOptions;

fn write_cbz(path: &Path, pages: usize) {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for page in 0..pages {
        writer
            .start_file(format!("page-{:03}.jpg", page), FileOptions::default())
            .unwrap();
        writer.write_all(&vec![page as u8; 1024]).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_audit_mixed_directory() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    write_cbz(&dir.join("good-1.cbz"), 3);
    write_cbz(&dir.join("GOOD-2.CBZ"), 1);
    fs::write(dir.join("broken.cbz"), b"this is an html error page").unwrap();
    fs::write(dir.join("broken.cbr"), vec![0x42; 2048]).unwrap();
    File::create(dir.join("empty.cbz")).unwrap();
    fs::write(dir.join("notes.txt"), b"not an archive").unwrap();

    let report = audit_directory(dir, AuditOptions::default());

    assert!(!report.directory_missing);
    assert_eq!(report.checked, 4);
    assert_eq!(report.valid, 2);
    assert_eq!(report.deleted.len(), 2);
    assert_eq!(report.skipped_empty, 1);

    assert!(dir.join("good-1.cbz").exists());
    assert!(dir.join("GOOD-2.CBZ").exists());
    assert!(!dir.join("broken.cbz").exists());
    assert!(!dir.join("broken.cbr").exists());
    assert!(dir.join("empty.cbz").exists());
    assert!(dir.join("notes.txt").exists());
}

#[test]
fn test_audit_dry_run_then_real_run() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("broken.cbz"), b"PK\x03\x04 truncated").unwrap();

    let dry = audit_directory(dir, AuditOptions { dry_run: true });
    assert_eq!(dry.corrupt_kept.len(), 1);
    assert!(dir.join("broken.cbz").exists());

    let real = audit_directory(dir, AuditOptions::default());
    assert_eq!(real.deleted.len(), 1);
    assert!(!dir.join("broken.cbz").exists());

    let again = audit_directory(dir, AuditOptions::default());
    assert_eq!(again.checked, 0);
}

#[test]
fn test_audit_deletes_archive_with_damaged_entry_data() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let path = dir.join("damaged.cbz");
    write_cbz(&path, 2);

    // Overwrite the start of the first entry's deflate stream
    let data_start = 30 + "page-000.jpg".len();
    let mut bytes = fs::read(&path).unwrap();
    for byte in &mut bytes[data_start..data_start + 8] {
        *byte = 0xFF;
    }
    fs::write(&path, &bytes).unwrap();

    let report = audit_directory(dir, AuditOptions::default());

    assert_eq!(report.checked, 1);
    assert_eq!(report.deleted, vec![path.clone()]);
    assert!(report.unverifiable.is_empty());
    assert!(!path.exists());
}
