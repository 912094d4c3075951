// s2inventory configuration
//
// Supports configuration from multiple sources:
// 1. CLI flags (applied by the binary, highest priority)
// 2. Environment variables (S2INVENTORY_ prefix)
// 3. Config file path from --config or S2INVENTORY_CONFIG
// 4. Config file contents from S2INVENTORY_CONFIG_CONTENT
// 5. Default config file location (./s2inventory.toml)
// 6. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use sources::StdEnvSource;

/// Bucket holding the published Sentinel-2 inventories
pub const DEFAULT_INVENTORY_BUCKET: &str = "sentinel-inventory";

/// Listing key suffix identifying a per-tile per-date marker row
pub const DEFAULT_MARKER_SUFFIX: &str = "productInfo.json";

/// Main runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Where inventories are read from and which rows matter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub bucket: String,
    pub marker_suffix: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_INVENTORY_BUCKET.to_string(),
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
        }
    }
}

/// Fan-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub threads: usize,
    pub on_pattern_mismatch: MismatchPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: 8,
            on_pattern_mismatch: MismatchPolicy::Skip,
        }
    }
}

/// What to do with a marker row whose key has no extractable date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Drop the row, count it and log a warning
    #[default]
    Skip,
    /// Abort the run
    Fail,
}

impl std::fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchPolicy::Skip => write!(f, "skip"),
            MismatchPolicy::Fail => write!(f, "fail"),
        }
    }
}

impl std::str::FromStr for MismatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "skip" | "drop" => Ok(MismatchPolicy::Skip),
            "fail" | "error" => Ok(MismatchPolicy::Fail),
            _ => anyhow::bail!("Unsupported mismatch policy: {}. Supported: skip, fail", s),
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            s3: Some(S3Config::default()),
            fs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Fs,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Fs => write!(f, "fs"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s3" | "aws" => Ok(StorageBackend::S3),
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            _ => anyhow::bail!("Unsupported storage backend: {}. Supported: s3, fs", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Region of the output bucket when it differs from the inventory region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_region: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "eu-central-1".to_string(),
            endpoint: None,
            output_region: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub root: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            root: "./data".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl RuntimeConfig {
    /// Load configuration from the environment and default file locations
    pub fn load() -> Result<Self> {
        sources::load_config(&StdEnvSource)
    }

    /// Load configuration from a specific file path (for CLI usage)
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path, &StdEnvSource)
    }

    /// Apply environment overrides from a custom source
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
