use super::{FsConfig, LogFormat, MismatchPolicy, RuntimeConfig, S3Config, StorageBackend};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "S2INVENTORY_";

/// Abstraction over environment-variable lookups so tests can supply
/// their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the S2INVENTORY_ prefix
    /// Used for AWS standard variables (AWS_ENDPOINT_URL)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Inventory
    if let Some(bucket) = env.get("INVENTORY_BUCKET") {
        config.inventory.bucket = bucket;
    }
    if let Some(suffix) = env.get("MARKER_SUFFIX") {
        config.inventory.marker_suffix = suffix;
    }

    // Run
    if let Some(val) = get_env_usize(env, "THREADS")? {
        config.run.threads = val;
    }
    if let Some(policy) = env.get("ON_PATTERN_MISMATCH") {
        config.run.on_pattern_mismatch = policy
            .parse::<MismatchPolicy>()
            .context("Invalid S2INVENTORY_ON_PATTERN_MISMATCH value")?;
    }

    // Storage backend
    if let Some(backend) = env.get("STORAGE_BACKEND") {
        config.storage.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid S2INVENTORY_STORAGE_BACKEND value")?;
    }

    // S3 storage
    if let Some(region) = env.get("S3_REGION") {
        ensure_s3(config).region = region;
    }
    if let Some(endpoint) = env.get("S3_ENDPOINT") {
        ensure_s3(config).endpoint = Some(endpoint);
    } else if let Some(endpoint) = env.get_raw("AWS_ENDPOINT_URL") {
        ensure_s3(config).endpoint = Some(endpoint);
    }
    if let Some(region) = env.get("S3_OUTPUT_REGION") {
        ensure_s3(config).output_region = Some(region);
    }

    // Filesystem storage
    if let Some(root) = env.get("FS_ROOT") {
        config.storage.fs.get_or_insert_with(FsConfig::default).root = root;
    }

    // Logging
    if let Some(level) = env.get("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = env.get("LOG_FORMAT") {
        config.log.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    Ok(())
}

fn ensure_s3(config: &mut RuntimeConfig) -> &mut S3Config {
    config.storage.s3.get_or_insert_with(S3Config::default)
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match env.get(key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
