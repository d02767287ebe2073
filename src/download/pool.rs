//! Bounded download pool
//!
//! Item links are dispatched onto a `JoinSet`, gated by a semaphore so that
//! at most `max_concurrent` transfers run at once. Every task is joined
//! before the pool returns; a failing or panicking task only costs its own
//! item.

use crate::crawler::ItemLink;
use crate::download::{DownloadEngine, DownloadOutcome};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Result of one dispatched item
#[derive(Debug)]
pub struct ItemReport {
    pub item: ItemLink,
    pub outcome: DownloadOutcome,
}

/// Runs the engine over `items` with at most `max_concurrent` in flight
///
/// Returns one report per item that ran to completion plus the number of
/// tasks that panicked.
pub async fn run_downloads(
    engine: Arc<DownloadEngine>,
    items: Vec<ItemLink>,
    max_concurrent: usize,
) -> (Vec<ItemReport>, usize) {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for item in items {
        // Acquire before spawning so pending items do not pile up as tasks
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let engine = Arc::clone(&engine);

        tasks.spawn(async move {
            let outcome = engine.process(&item).await;
            drop(permit);
            ItemReport { item, outcome }
        });
    }

    let mut reports = Vec::new();
    let mut panicked = 0;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!("Download task failed: {}", e);
                panicked += 1;
            }
        }
    }

    (reports, panicked)
}
