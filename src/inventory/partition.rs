//! Listing partitioner: one listing file in, rows grouped by date out.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};

use flate2::read::MultiGzDecoder;
use tracing::{debug, info, warn};

use super::date_key::DateKey;
use super::listing::{read_rows, ListingRow};
use super::manifest::ManifestFile;
use crate::config::MismatchPolicy;
use crate::error::{Result, SplitError};
use crate::storage::ObjectStore;

/// How marker rows are selected and dated
#[derive(Debug, Clone)]
pub struct PartitionOptions {
    pub marker_suffix: String,
    pub on_pattern_mismatch: MismatchPolicy,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            marker_suffix: crate::config::DEFAULT_MARKER_SUFFIX.to_string(),
            on_pattern_mismatch: MismatchPolicy::Skip,
        }
    }
}

/// Marker rows of one listing file, keyed by date
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub source_key: String,
    pub groups: BTreeMap<DateKey, Vec<ListingRow>>,
    /// All rows read from the listing
    pub rows_read: usize,
    /// Rows whose key ends with the marker suffix
    pub marker_rows: usize,
    /// Marker rows dropped because no date could be extracted
    pub mismatched: usize,
}

impl Grouping {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Download one listing file and group its marker rows by date.
///
/// The listing is staged in a private scratch directory that is removed
/// when this returns, whether it succeeds or not.
pub async fn partition_listing(
    store: &ObjectStore,
    file: &ManifestFile,
    options: &PartitionOptions,
) -> Result<Grouping> {
    info!(key = %file.key, "Processing listing file");

    let bytes = store.read(&file.key).await?;
    debug!(key = %file.key, bytes = bytes.len(), "Downloaded listing file");

    let key = file.key.clone();
    let options = options.clone();
    let grouping = tokio::task::spawn_blocking(move || {
        let scratch = tempfile::Builder::new()
            .prefix("s2inventory-")
            .tempdir()
            .map_err(|e| SplitError::transfer(key.as_str(), format!("scratch dir: {}", e)))?;

        let file_name = key
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("listing.csv");
        let local_path = scratch.path().join(file_name);
        std::fs::write(&local_path, &bytes)
            .map_err(|e| SplitError::transfer(key.as_str(), format!("scratch write: {}", e)))?;
        drop(bytes);

        let local = File::open(&local_path)
            .map_err(|e| SplitError::transfer(key.as_str(), format!("scratch read: {}", e)))?;
        let reader: Box<dyn Read> = if key.ends_with(".gz") {
            Box::new(MultiGzDecoder::new(BufReader::new(local)))
        } else {
            Box::new(BufReader::new(local))
        };

        partition_rows(reader, &key, &options)
    })
    .await
    .map_err(|e| SplitError::worker(format!("listing '{}': {}", file.key, e)))??;

    if grouping.mismatched > 0 {
        warn!(
            key = %file.key,
            mismatched = grouping.mismatched,
            "Dropped marker rows outside the tile date layout"
        );
    }

    info!(
        key = %file.key,
        rows = grouping.rows_read,
        marker_rows = grouping.marker_rows,
        dates = grouping.groups.len(),
        "Partitioned listing file"
    );

    Ok(grouping)
}

/// Group the marker rows of a decoded listing by date.
pub fn partition_rows<R: Read>(
    reader: R,
    source_key: &str,
    options: &PartitionOptions,
) -> Result<Grouping> {
    let mut grouping = Grouping {
        source_key: source_key.to_string(),
        ..Default::default()
    };

    for row in read_rows(reader, source_key) {
        let row = row?;
        grouping.rows_read += 1;

        if !row.key.ends_with(&options.marker_suffix) {
            continue;
        }
        grouping.marker_rows += 1;

        match DateKey::from_key(&row.key) {
            Ok(date) => grouping.groups.entry(date).or_default().push(row),
            Err(err) => match options.on_pattern_mismatch {
                MismatchPolicy::Skip => {
                    debug!(key = %row.key, "Skipping marker row without a date");
                    grouping.mismatched += 1;
                }
                MismatchPolicy::Fail => return Err(err),
            },
        }
    }

    Ok(grouping)
}
