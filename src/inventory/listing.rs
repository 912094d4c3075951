//! Inventory listing rows and their header-less CSV encoding.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

/// Number of columns in an inventory listing
const LISTING_COLUMNS: usize = 4;

/// One object known to the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub bucket: String,
    pub key: String,
    /// Empty in the listing for some entries
    pub file_size: Option<u64>,
    /// Kept exactly as published
    pub ingest_timestamp: String,
}

impl ListingRow {
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        file_size: Option<u64>,
        ingest_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            file_size,
            ingest_timestamp: ingest_timestamp.into(),
        }
    }
}

/// Iterate the rows of a header-less four-column listing.
///
/// `path` names the listing in parse errors.
pub fn read_rows<R: Read>(reader: R, path: &str) -> impl Iterator<Item = Result<ListingRow>> {
    let path = path.to_string();
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .enumerate()
        .map(move |(index, record)| {
            let line = index + 1;
            let record =
                record.map_err(|e| SplitError::parse(path.as_str(), format!("line {}: {}", line, e)))?;
            row_from_record(&record).map_err(|reason| {
                SplitError::parse(path.as_str(), format!("line {}: {}", line, reason))
            })
        })
}

fn row_from_record(record: &csv::StringRecord) -> std::result::Result<ListingRow, String> {
    if record.len() != LISTING_COLUMNS {
        return Err(format!(
            "expected {} columns, found {}",
            LISTING_COLUMNS,
            record.len()
        ));
    }

    let file_size = match record[2].trim() {
        "" => None,
        size => Some(
            size.parse::<u64>()
                .map_err(|e| format!("invalid file size '{}': {}", size, e))?,
        ),
    };

    Ok(ListingRow {
        bucket: record[0].to_string(),
        key: record[1].to_string(),
        file_size,
        ingest_timestamp: record[3].to_string(),
    })
}

/// Encode rows as header-less CSV, one `\n`-terminated line per row.
///
/// `path` is the object the bytes are destined for and names it in errors.
pub fn encode_rows(rows: &[ListingRow], path: &str) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.serialize(row).map_err(|e| encode_error(path, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| encode_error(path, e.error()))
}

fn encode_error(path: &str, reason: impl std::fmt::Display) -> SplitError {
    SplitError::transfer(path, format!("csv encoding failed: {}", reason))
}
