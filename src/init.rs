// Initialization utilities
//
// Object store and logging/tracing setup

use crate::config::{LogConfig, LogFormat, RuntimeConfig, StorageBackend};
use crate::storage::ObjectStore;
use anyhow::{Context, Result};
use tracing::info;

/// Build the inventory and output stores from RuntimeConfig
pub fn init_stores(config: &RuntimeConfig, output_bucket: &str) -> Result<(ObjectStore, ObjectStore)> {
    info!(
        "Initializing object stores with storage backend: {}",
        config.storage.backend
    );

    match config.storage.backend {
        StorageBackend::S3 => {
            if let Some(s3) = config.storage.s3.as_ref() {
                info!(
                    region = %s3.region,
                    endpoint = s3.endpoint.as_deref().unwrap_or("default"),
                    "Using S3 storage"
                );
            }
        }
        StorageBackend::Fs => {
            if let Some(fs) = config.storage.fs.as_ref() {
                info!("Using filesystem storage at: {}", fs.root);
            }
        }
    }

    let source = ObjectStore::inventory(&config.storage, &config.inventory.bucket)
        .context("Failed to initialize inventory storage")?;
    let sink = ObjectStore::output(&config.storage, output_bucket)
        .context("Failed to initialize output storage")?;

    Ok((source, sink))
}

/// Initialize tracing/logging from LogConfig
pub fn init_tracing(config: &LogConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Ignore error if already set (idempotent)
    let _ = match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().with_writer(std::io::stderr)),
        ),
    };
}
