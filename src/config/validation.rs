// Configuration validation
//
// Validates that required fields are present and values are sensible

use super::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_inventory_config(&config.inventory)?;
    validate_run_config(&config.run)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

fn validate_inventory_config(config: &InventoryConfig) -> Result<()> {
    if config.bucket.is_empty() {
        bail!(
            "Inventory bucket name is required\n\n\
            How to fix:\n\
              • Environment: export {}INVENTORY_BUCKET=sentinel-inventory\n\
              • TOML: [inventory]\n              bucket = \"sentinel-inventory\"\n",
            ENV_PREFIX
        );
    }

    if config.marker_suffix.is_empty() {
        bail!("inventory.marker_suffix must not be empty");
    }

    Ok(())
}

fn validate_run_config(config: &RunConfig) -> Result<()> {
    if config.threads == 0 {
        bail!("run.threads must be greater than 0");
    }

    if config.threads > 256 {
        warn!(
            threads = config.threads,
            "run.threads is very large; each worker holds a whole listing file in memory"
        );
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<()> {
    match config.backend {
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("s3 storage backend requires 's3' configuration"))?;

            if s3.region.is_empty() {
                bail!(
                    "S3 region is required\n\n\
                    How to fix:\n\
                      • Environment: export {}S3_REGION=eu-central-1\n\
                      • TOML: [storage.s3]\n              region = \"eu-central-1\"\n",
                    ENV_PREFIX
                );
            }
        }
        StorageBackend::Fs => {
            let fs = config
                .fs
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("fs storage backend requires 'fs' configuration"))?;

            if fs.root.is_empty() {
                bail!(
                    "Filesystem root is required\n\n\
                    How to fix:\n\
                      • Environment: export {}FS_ROOT=/data/buckets\n\
                      • TOML: [storage.fs]\n              root = \"/data/buckets\"\n",
                    ENV_PREFIX
                );
            }
        }
    }

    Ok(())
}
