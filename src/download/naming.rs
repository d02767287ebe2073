use crate::url::last_path_segment;
use std::path::{Path, PathBuf};

/// Suffix of a download that has not completed yet
pub const PARTIAL_SUFFIX: &str = ".part";

/// Comic archive container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// ZIP-family archive (`.cbz`)
    Cbz,
    /// RAR-family archive (`.cbr`)
    Cbr,
}

impl ArchiveKind {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Cbz => "cbz",
            Self::Cbr => "cbr",
        }
    }

    /// Parses a bare extension ("cbz"/"cbr", any case)
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("cbz") {
            Some(Self::Cbz)
        } else if ext.eq_ignore_ascii_case("cbr") {
            Some(Self::Cbr)
        } else {
            None
        }
    }

    /// Classifies a file name by its extension, case-insensitively
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Sniffs the archive kind from the asset URL
    ///
    /// `.cbz` anywhere in the URL wins, then `.cbr`; otherwise `default`.
    pub fn from_asset_url(asset_url: &str, default: ArchiveKind) -> Self {
        let lowered = asset_url.to_ascii_lowercase();
        if lowered.contains(".cbz") {
            Self::Cbz
        } else if lowered.contains(".cbr") {
            Self::Cbr
        } else {
            default
        }
    }

    /// Both kinds, for lookups that do not know the extension yet
    pub fn all() -> [ArchiveKind; 2] {
        [Self::Cbz, Self::Cbr]
    }
}

/// Derives the archive base name from an item-page URL
///
/// This is the last non-empty path segment of the item URL, never the
/// asset URL.
pub fn derive_name(item_url: &str) -> Option<String> {
    last_path_segment(item_url).map(str::to_string)
}

/// True when `name` is a comment anchor rather than a comic
pub fn is_navigation_artifact(name: &str, comment_marker: &str) -> bool {
    name.contains(comment_marker)
}

/// `<name>.<ext>`
pub fn archive_file_name(name: &str, kind: ArchiveKind) -> String {
    format!("{}.{}", name, kind.extension())
}

/// Temporary path a download is written to before the final rename
pub fn partial_path(final_path: &Path) -> PathBuf {
    let mut raw = final_path.as_os_str().to_owned();
    raw.push(PARTIAL_SUFFIX);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_from_item_url() {
        assert_eq!(
            derive_name("https://example.org/dc/batman-1-2024/"),
            Some("batman-1-2024".to_string())
        );
    }

    #[test]
    fn test_comment_anchor_is_artifact() {
        let name = derive_name("https://example.org/dc/batman-1-2024/#comments").unwrap();
        assert!(is_navigation_artifact(&name, "#comment"));
        assert!(!is_navigation_artifact("batman-1-2024", "#comment"));
    }

    #[test]
    fn test_kind_from_asset_url() {
        assert_eq!(
            ArchiveKind::from_asset_url("https://cdn.example.org/Batman%20001.cbz", ArchiveKind::Cbr),
            ArchiveKind::Cbz
        );
        assert_eq!(
            ArchiveKind::from_asset_url("https://cdn.example.org/Batman%20001.CBR", ArchiveKind::Cbz),
            ArchiveKind::Cbr
        );
        assert_eq!(
            ArchiveKind::from_asset_url("https://example.org/dlds/abc123/", ArchiveKind::Cbz),
            ArchiveKind::Cbz
        );
        assert_eq!(
            ArchiveKind::from_asset_url("https://example.org/dlds/abc123/", ArchiveKind::Cbr),
            ArchiveKind::Cbr
        );
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(ArchiveKind::from_file_name("a.cbz"), Some(ArchiveKind::Cbz));
        assert_eq!(ArchiveKind::from_file_name("A.CBR"), Some(ArchiveKind::Cbr));
        assert_eq!(ArchiveKind::from_file_name("a.cbz.part"), None);
        assert_eq!(ArchiveKind::from_file_name("cbz"), None);
        assert_eq!(ArchiveKind::from_file_name("notes.txt"), None);
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/comics/item-a.cbz")),
            PathBuf::from("/comics/item-a.cbz.part")
        );
    }
}
