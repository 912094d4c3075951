//! Merge per-worker groupings and write one CSV object per date.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::Result;
use crate::inventory::{encode_rows, DateKey, Grouping, ListingRow};
use crate::storage::ObjectStore;

/// Rows of every grouping, concatenated per date
pub type MergedGroups = BTreeMap<DateKey, Vec<ListingRow>>;

const OUTPUT_FILE: &str = "data.csv";

/// Union the date keys of all groupings and concatenate their rows.
///
/// Rows keep grouping order, then in-grouping order. A grouping without a
/// given date contributes nothing to it.
pub fn merge_groupings<I>(groupings: I) -> MergedGroups
where
    I: IntoIterator<Item = Grouping>,
{
    let mut merged = MergedGroups::new();
    for grouping in groupings {
        for (date, rows) in grouping.groups {
            merged.entry(date).or_default().extend(rows);
        }
    }
    merged
}

/// `<prefix>/<YYYY>/<MM>/<DD>/data.csv`
pub fn output_path(prefix: &str, date: &DateKey) -> String {
    let (y, m, d) = date.path_segments();
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{}/{}/{}/{}", y, m, d, OUTPUT_FILE)
    } else {
        format!("{}/{}/{}/{}/{}", prefix, y, m, d, OUTPUT_FILE)
    }
}

/// Write every merged group in date order, replacing existing objects.
///
/// Returns the written paths. Objects written before a failure stay written.
pub async fn emit_groups(
    sink: &ObjectStore,
    prefix: &str,
    merged: MergedGroups,
) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(merged.len());

    for (date, rows) in merged {
        let path = output_path(prefix, &date);
        let body = encode_rows(&rows, &path)?;
        let bytes = body.len();

        sink.write(&path, body).await?;

        info!(
            date = %date,
            bucket = sink.bucket(),
            path = %path,
            rows = rows.len(),
            bytes,
            "Wrote date partition"
        );
        written.push(path);
    }

    Ok(written)
}
