//! Local inventory of already-downloaded archives
//!
//! Before crawling starts, known storage roots are searched for `.cbz` and
//! `.cbr` files. The resulting set of file names lets the pipeline drop
//! items that were fetched by an earlier run, possibly into a different
//! folder or onto a different drive. Identity is the file name alone.

mod roots;

pub use roots::detect_storage_roots;

use crate::download::{archive_file_name, ArchiveKind};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Set of archive file names found on local storage
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    names: HashSet<String>,
}

impl Inventory {
    /// Number of archives known
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing was found
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact file-name membership (`item-a.cbz`)
    pub fn contains(&self, file_name: &str) -> bool {
        self.names.contains(file_name)
    }

    /// True when an archive of either kind exists for this base name
    pub fn contains_item(&self, name: &str) -> bool {
        ArchiveKind::all()
            .iter()
            .any(|kind| self.contains(&archive_file_name(name, *kind)))
    }

    fn insert(&mut self, file_name: String) {
        self.names.insert(file_name);
    }
}

impl FromIterator<String> for Inventory {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Scans `subfolders` under every root and collects archive file names
///
/// Roots or subfolders that do not exist are skipped silently. Unreadable
/// entries inside a walk are skipped as well.
pub fn scan(roots: &[PathBuf], subfolders: &[String]) -> Inventory {
    let mut inventory = Inventory::default();

    for root in roots {
        for subfolder in subfolders {
            let folder = root.join(subfolder);
            if !folder.is_dir() {
                continue;
            }
            tracing::debug!("Scanning {}", folder.display());
            scan_folder(&folder, &mut inventory);
        }
    }

    inventory
}

fn scan_folder(folder: &Path, inventory: &mut Inventory) {
    for entry in WalkDir::new(folder).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if ArchiveKind::from_file_name(&name).is_some() {
            inventory.insert(name.into_owned());
        }
    }
}
