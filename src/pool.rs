//! Bounded fan-out of listing partitioners.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::error::{Result, SplitError};
use crate::inventory::{partition_listing, Grouping, ManifestFile, PartitionOptions};
use crate::storage::ObjectStore;

/// Partition every listing file, at most `threads` at a time.
///
/// Groupings come back in manifest order. The first failure aborts the
/// workers still running and is returned; nothing is partially returned.
pub async fn partition_all(
    store: &ObjectStore,
    files: Vec<ManifestFile>,
    threads: usize,
    options: &PartitionOptions,
) -> Result<Vec<Grouping>> {
    if threads == 0 {
        return Err(SplitError::invalid_config(
            "worker count must be greater than 0",
        ));
    }

    let total = files.len();
    let permits = Arc::new(Semaphore::new(threads));
    let mut workers = JoinSet::new();

    for (index, file) in files.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let store = store.clone();
        let options = options.clone();
        workers.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| SplitError::worker(e.to_string()))?;
            let grouping = partition_listing(&store, &file, &options).await?;
            Ok::<_, SplitError>((index, grouping))
        });
    }

    let mut results: Vec<(usize, Grouping)> = Vec::with_capacity(total);
    while let Some(joined) = workers.join_next().await {
        let outcome = joined
            .map_err(|e| SplitError::worker(e.to_string()))
            .and_then(|result| result);

        match outcome {
            Ok(done) => {
                results.push(done);
                debug!(completed = results.len(), total, "Listing file done");
            }
            Err(e) => {
                error!(error = %e, "Worker failed, aborting remaining listing files");
                workers.abort_all();
                return Err(e);
            }
        }
    }

    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, grouping)| grouping).collect())
}
