//! Harvest pipeline - end-to-end orchestration
//!
//! This module ties the pieces of a run together:
//! - Preparing the download directory and sweeping stale partial files
//! - Scanning the local inventory
//! - Walking the catalog for item links
//! - Dropping items the inventory already knows
//! - Dispatching the rest onto the bounded download pool

use crate::config::Config;
use crate::crawler::{CatalogWalker, Fetcher, ItemLink};
use crate::download::{derive_name, run_downloads, sweep_partials, DownloadEngine, ProgressBoard};
use crate::inventory::{detect_storage_roots, scan, Inventory};
use crate::output::RunSummary;
use crate::HarvestError;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Main harvest coordinator structure
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Fetcher,
    dest_dir: PathBuf,
}

impl Harvester {
    /// Creates a harvester, building its HTTP client from the configuration
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::from_config(&config.user_agent, &config.crawler)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a harvester around an already constructed fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        let dest_dir = PathBuf::from(&config.output.download_dir);
        Self {
            config: Arc::new(config),
            fetcher,
            dest_dir,
        }
    }

    /// Runs the whole pipeline and returns its summary
    ///
    /// Only setup failures (the download directory cannot be created or
    /// read) are errors. Page and item failures are counted in the summary.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let mut summary = RunSummary::new();

        tokio::fs::create_dir_all(&self.dest_dir).await?;
        summary.partials_swept = sweep_partials(&self.dest_dir).await? as u64;

        let inventory = if self.config.inventory.enabled {
            let inventory = self.scan_inventory().await?;
            tracing::info!("Found {} comics already on local storage", inventory.len());
            Some(inventory)
        } else {
            None
        };

        let walker = CatalogWalker::new(
            self.fetcher.clone(),
            self.config.site.clone(),
            self.config.crawler.max_pages,
        );
        let walk = walker.collect(&self.config.categories).await;
        summary.pages_fetched = walk.pages_fetched;
        summary.pages_failed = walk.pages_failed;
        summary.items_found = walk.links.len() as u64;
        tracing::info!("Found {} comics.", walk.links.len());

        let (queue, known) = prefilter(walk.links, inventory.as_ref());
        summary.known_in_inventory = known;
        if known > 0 {
            tracing::info!("Skipping {} comics found in the local inventory", known);
        }

        let engine = Arc::new(DownloadEngine::new(
            self.fetcher.clone(),
            self.config.site.clone(),
            self.dest_dir.clone(),
            ProgressBoard::new(self.config.crawler.show_progress),
        ));
        let max_concurrent = self.config.crawler.max_concurrent_downloads as usize;
        tracing::info!(
            "Dispatching {} downloads ({} at a time)",
            queue.len(),
            max_concurrent
        );

        let (reports, panicked) = run_downloads(engine, queue, max_concurrent).await;
        summary.record_all(&reports);
        summary.tasks_failed = panicked as u64;
        summary.finish();

        Ok(summary)
    }

    async fn scan_inventory(&self) -> Result<Inventory, HarvestError> {
        let roots: Vec<PathBuf> = if self.config.inventory.roots.is_empty() {
            detect_storage_roots()
        } else {
            self.config.inventory.roots.iter().map(PathBuf::from).collect()
        };
        let subfolders = self.config.inventory.subfolders.clone();

        tracing::debug!("Inventory roots: {:?}", roots);
        let inventory = tokio::task::spawn_blocking(move || scan(&roots, &subfolders)).await?;
        Ok(inventory)
    }
}

/// Removes items whose archive name is already in the inventory
///
/// Returns the remaining queue and how many items were dropped. The
/// destination check in the engine still guards every write.
pub fn prefilter(
    links: BTreeSet<ItemLink>,
    inventory: Option<&Inventory>,
) -> (Vec<ItemLink>, u64) {
    let Some(inventory) = inventory else {
        return (links.into_iter().collect(), 0);
    };

    let mut known = 0;
    let queue = links
        .into_iter()
        .filter(|link| {
            let is_known = derive_name(link)
                .map(|name| inventory.contains_item(&name))
                .unwrap_or(false);
            if is_known {
                tracing::debug!("Already in inventory: {}", link);
                known += 1;
            }
            !is_known
        })
        .collect();

    (queue, known)
}

/// Runs a complete harvest for `config`
pub async fn harvest(config: Config) -> Result<RunSummary, HarvestError> {
    Harvester::new(config)?.run().await
}
