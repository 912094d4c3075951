//! Manifest resolution for the daily Sentinel-2 inventory.
//!
//! Inventories are published once a day under
//! `sentinel-s2-{collection}/sentinel-s2-{collection}-inventory/{YYYY}-{MM}-{DD}T00-00Z/`
//! and are processed the day after publication.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, SplitError};
use crate::storage::ObjectStore;

const MANIFEST_FILE: &str = "manifest.json";

/// One listing file declared by a manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestFile {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "MD5checksum")]
    pub md5_checksum: Option<String>,
}

impl ManifestFile {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            md5_checksum: None,
        }
    }
}

/// Inventory manifest payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub source_bucket: Option<String>,
    #[serde(default)]
    pub destination_bucket: Option<String>,
    #[serde(default)]
    pub file_format: Option<String>,
    pub files: Vec<ManifestFile>,
}

impl Manifest {
    /// Parse and check a manifest payload; `path` names it in errors
    pub fn parse(bytes: &[u8], path: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_slice(bytes).map_err(|e| SplitError::parse(path, e))?;

        if let Some(format) = manifest.file_format.as_deref() {
            if !format.eq_ignore_ascii_case("csv") {
                return Err(SplitError::parse(
                    path,
                    format!("unsupported inventory file format '{}', expected CSV", format),
                ));
            }
        }

        Ok(manifest)
    }
}

/// Day whose inventory is processed on `run_date`
pub fn inventory_date(run_date: NaiveDate) -> Result<NaiveDate> {
    run_date.pred_opt().ok_or_else(|| {
        SplitError::invalid_config(format!("run date {} has no previous day", run_date))
    })
}

/// Storage prefix of the inventory processed on `run_date`
pub fn manifest_prefix(collection: &str, run_date: NaiveDate) -> Result<String> {
    let day = inventory_date(run_date)?;
    Ok(format!(
        "sentinel-s2-{c}/sentinel-s2-{c}-inventory/{y:04}-{m:02}-{d:02}T00-00Z",
        c = collection,
        y = day.year(),
        m = day.month(),
        d = day.day()
    ))
}

/// Key of the manifest processed on `run_date`
pub fn manifest_key(collection: &str, run_date: NaiveDate) -> Result<String> {
    Ok(format!(
        "{}/{}",
        manifest_prefix(collection, run_date)?,
        MANIFEST_FILE
    ))
}

/// Fetch the manifest processed on `run_date` and return its listing files.
pub async fn fetch_manifest(
    store: &ObjectStore,
    collection: &str,
    run_date: NaiveDate,
) -> Result<Vec<ManifestFile>> {
    let key = manifest_key(collection, run_date)?;
    debug!(bucket = store.bucket(), key = %key, "Fetching inventory manifest");

    let bytes = store.read(&key).await?;
    let manifest = Manifest::parse(&bytes, &key)?;

    info!(
        key = %key,
        files = manifest.files.len(),
        source_bucket = manifest.source_bucket.as_deref().unwrap_or("-"),
        "Resolved inventory manifest"
    );

    Ok(manifest.files)
}
