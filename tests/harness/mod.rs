//! Shared fixtures for pipeline integration tests
//!
//! Every store is backed by the OpenDAL in-memory service, so each call to
//! `memory_store` yields an independent, empty bucket.

#![allow(dead_code)]

use std::io::Write;

use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use opendal::{services, Operator};
use s2inventory::inventory::{manifest_key, PartitionOptions};
use s2inventory::{ObjectStore, SplitDaysRequest};

pub const COLLECTION: &str = "l1c";
pub const OUTPUT_PREFIX: &str = "daily";

/// A run on this date processes the 2023-03-05 inventory
pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 3, 6).expect("valid date")
}

pub fn memory_store(bucket: &str) -> ObjectStore {
    let op = Operator::new(services::Memory::default())
        .expect("Failed to create memory operator")
        .finish();
    ObjectStore::from_operator(bucket, op)
}

pub fn request(threads: usize) -> SplitDaysRequest {
    SplitDaysRequest {
        collection: COLLECTION.to_string(),
        output_prefix: OUTPUT_PREFIX.to_string(),
        threads,
        take: None,
        run_date: run_date(),
        partition: PartitionOptions::default(),
    }
}

/// One listing line: `bucket,key,size,timestamp`
pub fn row(bucket: &str, key: &str, size: u64) -> String {
    format!("{},{},{},2023-03-05T10:00:00.000Z\n", bucket, key, size)
}

pub async fn seed_manifest(store: &ObjectStore, listing_keys: &[&str]) {
    let files: Vec<String> = listing_keys
        .iter()
        .map(|key| format!(r#"{{"key": "{}", "size": 1, "MD5checksum": "x"}}"#, key))
        .collect();
    let body = format!(
        r#"{{"sourceBucket": "sentinel-s2-{c}", "fileFormat": "CSV", "files": [{files}]}}"#,
        c = COLLECTION,
        files = files.join(",")
    );
    let key = manifest_key(COLLECTION, run_date()).expect("valid manifest key");
    store
        .write(&key, body.into_bytes())
        .await
        .expect("Failed to seed manifest");
}

pub async fn seed_listing(store: &ObjectStore, key: &str, lines: &[String]) {
    let body = lines.concat().into_bytes();
    let body = if key.ends_with(".gz") {
        gzip(&body)
    } else {
        body
    };
    store
        .write(key, body)
        .await
        .expect("Failed to seed listing file");
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// Read an output object as sorted lines
pub async fn sorted_lines(store: &ObjectStore, path: &str) -> Vec<String> {
    let bytes = store.read(path).await.expect("Failed to read output");
    let mut lines: Vec<String> = String::from_utf8(bytes)
        .expect("utf8 output")
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}
