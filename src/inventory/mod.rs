//! Sentinel-2 inventory: manifests, listings and date attribution.

mod date_key;
mod listing;
mod manifest;
mod partition;

pub use date_key::DateKey;
pub use listing::{encode_rows, read_rows, ListingRow};
pub use manifest::{
    fetch_manifest, inventory_date, manifest_key, manifest_prefix, Manifest, ManifestFile,
};
pub use partition::{partition_listing, partition_rows, Grouping, PartitionOptions};
