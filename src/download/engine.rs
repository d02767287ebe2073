//! Resolution & download engine
//!
//! Processes one item link at a time: item page, asset link, file name,
//! destination gate, reservation, streaming transfer, final rename. Each
//! step either hands over to the next or ends the item with a
//! [`DownloadOutcome`]; nothing here ever fails the whole run.

use crate::config::SiteConfig;
use crate::crawler::{extract_asset_link, Fetcher};
use crate::download::naming::{
    archive_file_name, derive_name, is_navigation_artifact, partial_path, ArchiveKind,
    PARTIAL_SUFFIX,
};
use crate::download::progress::ProgressBoard;
use crate::FetchError;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// Write granularity for asset transfers
pub const CHUNK_SIZE: usize = 8192;

/// How processing of one item ended
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The archive was transferred completely and moved into place
    Downloaded { path: PathBuf, bytes: u64 },

    /// The destination already exists; nothing was written
    AlreadyPresent { path: PathBuf },

    /// Another worker of this run holds the reservation for the same file
    InProgress { path: PathBuf },

    /// The item link is a comment anchor, not a comic
    NavigationArtifact { name: String },

    /// The item page offers no download-resolution link
    MissingAssetLink,

    /// No file name could be derived from the item URL
    Unnamed,

    /// The item page or the asset could not be fetched
    FetchFailed(FetchError),

    /// The transfer broke off; the partial file was discarded
    StreamFailed { path: PathBuf, reason: String },
}

impl DownloadOutcome {
    /// True for outcomes that count as failures in the run summary
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingAssetLink | Self::Unnamed | Self::FetchFailed(_) | Self::StreamFailed { .. }
        )
    }
}

/// Exclusive reservation of a destination file name
///
/// The `.part` file is created with exclusive-create, so at most one worker
/// can hold it. Unless committed, the partial file is removed on drop.
struct Reservation {
    partial: PathBuf,
    committed: bool,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = std::fs::remove_file(&self.partial) {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        "Failed to remove partial file {}: {}",
                        self.partial.display(),
                        e
                    );
                }
            }
        }
    }
}

/// Resolves item links and streams their archives to disk
pub struct DownloadEngine {
    fetcher: Fetcher,
    site: SiteConfig,
    dest_dir: PathBuf,
    default_kind: ArchiveKind,
    progress: ProgressBoard,
}

impl DownloadEngine {
    /// Creates a new engine writing into `dest_dir`
    pub fn new(
        fetcher: Fetcher,
        site: SiteConfig,
        dest_dir: PathBuf,
        progress: ProgressBoard,
    ) -> Self {
        let default_kind =
            ArchiveKind::from_extension(&site.default_extension).unwrap_or(ArchiveKind::Cbz);
        Self {
            fetcher,
            site,
            dest_dir,
            default_kind,
            progress,
        }
    }

    /// Destination directory of this engine
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Processes one item link end to end
    pub async fn process(&self, item: &str) -> DownloadOutcome {
        // Item page
        let html = match self.fetcher.fetch_page(item).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to access {}: {}", item, e);
                return DownloadOutcome::FetchFailed(e);
            }
        };

        // Direct asset link
        let asset_url = match Url::parse(item)
            .ok()
            .and_then(|base| extract_asset_link(&html, &base, &self.site.download_marker))
        {
            Some(url) => url,
            None => {
                tracing::warn!("No direct download link found for {}", item);
                return DownloadOutcome::MissingAssetLink;
            }
        };

        // File name from the item URL
        let Some(name) = derive_name(item) else {
            tracing::warn!("Cannot derive a file name from {}", item);
            return DownloadOutcome::Unnamed;
        };
        if is_navigation_artifact(&name, &self.site.comment_marker) {
            tracing::debug!("Skipping: {}", name);
            return DownloadOutcome::NavigationArtifact { name };
        }

        let kind = ArchiveKind::from_asset_url(&asset_url, self.default_kind);
        let file_name = archive_file_name(&name, kind);
        let path = self.dest_dir.join(&file_name);

        if path_exists(&path).await {
            tracing::info!("Skipping already downloaded: {}", file_name);
            return DownloadOutcome::AlreadyPresent { path };
        }

        let mut reservation = match self.reserve(&path).await {
            Ok(reservation) => reservation,
            Err(outcome) => return outcome,
        };

        // A sibling may have finished between the first check and the reservation
        if path_exists(&path).await {
            tracing::info!("Skipping already downloaded: {}", file_name);
            return DownloadOutcome::AlreadyPresent { path };
        }

        match self
            .transfer(&asset_url, &reservation.partial, &file_name)
            .await
        {
            Ok(bytes) => {
                if path_exists(&path).await {
                    return DownloadOutcome::AlreadyPresent { path };
                }
                if let Err(e) = tokio::fs::rename(&reservation.partial, &path).await {
                    tracing::error!("Failed to move {} into place: {}", file_name, e);
                    return DownloadOutcome::StreamFailed {
                        path,
                        reason: e.to_string(),
                    };
                }
                reservation.committed = true;
                tracing::info!("Downloaded: {} ({} bytes)", path.display(), bytes);
                DownloadOutcome::Downloaded { path, bytes }
            }
            Err(TransferError::Fetch(e)) => {
                tracing::warn!("Failed to open asset for {}: {}", file_name, e);
                DownloadOutcome::FetchFailed(e)
            }
            Err(TransferError::Stream(reason)) => {
                tracing::error!("Download of {} failed: {}", file_name, reason);
                DownloadOutcome::StreamFailed { path, reason }
            }
        }
    }

    /// Claims `path` for this worker by creating its `.part` file exclusively
    async fn reserve(&self, path: &Path) -> Result<Reservation, DownloadOutcome> {
        let partial = partial_path(path);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&partial)
            .await
        {
            Ok(_) => Ok(Reservation {
                partial,
                committed: false,
            }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::info!("Already being downloaded: {}", path.display());
                Err(DownloadOutcome::InProgress {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                tracing::error!("Failed to create {}: {}", partial.display(), e);
                Err(DownloadOutcome::StreamFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Streams the asset into `partial`, returning the byte count
    ///
    /// A stalled stream, a network error, a write error, or fewer bytes than
    /// the declared content length all fail the transfer.
    async fn transfer(
        &self,
        asset_url: &str,
        partial: &Path,
        file_name: &str,
    ) -> Result<u64, TransferError> {
        let response = self
            .fetcher
            .open_asset(asset_url)
            .await
            .map_err(TransferError::Fetch)?;
        let declared = response.content_length().unwrap_or(0);

        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(partial)
            .await
            .map_err(TransferError::io)?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);

        let mut progress = self.progress.start(file_name, declared);
        let mut stream = response.bytes_stream();
        let stall = self.fetcher.asset_timeout();

        let result = async {
            loop {
                let chunk = match tokio::time::timeout(stall, stream.next()).await {
                    Err(_) => {
                        return Err(TransferError::Stream(format!(
                            "no data received for {}s",
                            stall.as_secs()
                        )))
                    }
                    Ok(None) => break,
                    Ok(Some(Err(e))) => return Err(TransferError::Stream(e.to_string())),
                    Ok(Some(Ok(chunk))) => chunk,
                };

                writer.write_all(&chunk).await.map_err(TransferError::io)?;
                progress.advance(chunk.len() as u64);
            }

            writer.flush().await.map_err(TransferError::io)?;
            writer.get_ref().sync_all().await.map_err(TransferError::io)?;
            Ok::<(), TransferError>(())
        }
        .await;

        let downloaded = progress.downloaded();
        progress.finish();
        result?;

        if declared > 0 && downloaded != declared {
            return Err(TransferError::Stream(format!(
                "received {} of {} declared bytes",
                downloaded, declared
            )));
        }

        Ok(downloaded)
    }
}

enum TransferError {
    Fetch(FetchError),
    Stream(String),
}

impl TransferError {
    fn io(e: std::io::Error) -> Self {
        TransferError::Stream(e.to_string())
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Removes `.part` files left behind by interrupted earlier runs
///
/// Only archive partials (`<name>.cbz.part`, `<name>.cbr.part`) are touched;
/// other programs' `.part` files in the same directory are left alone.
/// Must run before any download of this run starts, while no reservation
/// can be live. Returns the number of files removed.
pub async fn sweep_partials(dest_dir: &Path) -> std::io::Result<usize> {
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dest_dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if !is_archive_partial(&name.to_string_lossy()) {
            continue;
        }
        if entry.file_type().await?.is_file() {
            tracing::info!(
                "Removing incomplete prior attempt: {}",
                entry.path().display()
            );
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}

fn is_archive_partial(file_name: &str) -> bool {
    file_name
        .strip_suffix(PARTIAL_SUFFIX)
        .and_then(ArchiveKind::from_file_name)
        .is_some()
}
