use std::path::PathBuf;

/// Lists the storage roots present on this machine
///
/// On Windows this is every drive letter that exists. Elsewhere it is the
/// home directory plus every volume mounted under `/media`, `/mnt`, or
/// `/Volumes` (one level down, and a second level under `/media/<user>`).
pub fn detect_storage_roots() -> Vec<PathBuf> {
    let mut roots = platform_roots();
    roots.retain(|root| root.is_dir());
    roots.sort();
    roots.dedup();
    roots
}

#[cfg(windows)]
fn platform_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|drive| drive.exists())
        .collect()
}

#[cfg(not(windows))]
fn platform_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(home) = dirs::home_dir() {
        roots.push(home);
    }

    for mount_base in ["/mnt", "/Volumes"] {
        roots.extend(child_dirs(&PathBuf::from(mount_base)));
    }

    // /media/<user>/<volume> on most desktop distributions
    for entry in child_dirs(&PathBuf::from("/media")) {
        let volumes = child_dirs(&entry);
        if volumes.is_empty() {
            roots.push(entry);
        } else {
            roots.extend(volumes);
        }
    }

    roots
}

#[cfg(not(windows))]
fn child_dirs(base: &std::path::Path) -> Vec<PathBuf> {
    std::fs::read_dir(base)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect()
        })
        .unwrap_or_default()
}
