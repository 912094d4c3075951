// OpenDAL-backed object store handle
//
// One handle per bucket. Handles are cheap to clone and are passed
// explicitly into every component:
// - S3 (ambient AWS credentials, optional custom endpoint)
// - Filesystem (each bucket is a directory under a root)
// - Any pre-built operator (tests use the in-memory service)

use opendal::{ErrorKind, Operator};

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Result, SplitError};

#[derive(Clone)]
pub struct ObjectStore {
    bucket: String,
    operator: Operator,
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl ObjectStore {
    /// Wrap an existing operator
    pub fn from_operator(bucket: impl Into<String>, operator: Operator) -> Self {
        Self {
            bucket: bucket.into(),
            operator,
        }
    }

    /// Create a store for S3 (or an S3-compatible endpoint)
    pub fn new_s3(bucket: &str, region: &str, endpoint: Option<&str>) -> Result<Self> {
        let mut builder = opendal::services::S3::default()
            .bucket(bucket)
            .region(region);

        if let Some(ep) = endpoint {
            builder = builder.endpoint(ep);
        }

        let operator = Operator::new(builder)
            .map_err(|e| {
                SplitError::invalid_config(format!(
                    "Failed to create S3 operator for bucket '{}': {}",
                    bucket, e
                ))
            })?
            .finish();

        Ok(Self::from_operator(bucket, operator))
    }

    /// Create a store rooted at `<root>/<bucket>` on the local filesystem
    pub fn new_fs(root: &str, bucket: &str) -> Result<Self> {
        let path = std::path::Path::new(root).join(bucket);
        let builder = opendal::services::Fs::default().root(&path.to_string_lossy());

        let operator = Operator::new(builder)
            .map_err(|e| {
                SplitError::invalid_config(format!(
                    "Failed to create filesystem operator at '{}': {}",
                    path.display(),
                    e
                ))
            })?
            .finish();

        Ok(Self::from_operator(bucket, operator))
    }

    /// Build the source (inventory) store from configuration
    pub fn inventory(config: &StorageConfig, bucket: &str) -> Result<Self> {
        Self::for_bucket(config, bucket, false)
    }

    /// Build the destination store from configuration
    pub fn output(config: &StorageConfig, bucket: &str) -> Result<Self> {
        Self::for_bucket(config, bucket, true)
    }

    fn for_bucket(config: &StorageConfig, bucket: &str, is_output: bool) -> Result<Self> {
        if bucket.is_empty() {
            return Err(SplitError::invalid_config("bucket name must not be empty"));
        }

        match config.backend {
            StorageBackend::S3 => {
                let s3 = config.s3.as_ref().ok_or_else(|| {
                    SplitError::invalid_config("s3 config required for S3 backend")
                })?;
                let region = match (&s3.output_region, is_output) {
                    (Some(output_region), true) => output_region.as_str(),
                    _ => s3.region.as_str(),
                };
                Self::new_s3(bucket, region, s3.endpoint.as_deref())
            }
            StorageBackend::Fs => {
                let fs = config.fs.as_ref().ok_or_else(|| {
                    SplitError::invalid_config("fs config required for filesystem backend")
                })?;
                Self::new_fs(&fs.root, bucket)
            }
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Read a whole object
    pub async fn read(&self, path: &str) -> Result<Vec<u8>> {
        match self.operator.read(path).await {
            Ok(buffer) => Ok(buffer.to_vec()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SplitError::not_found(
                format!("{}/{}", self.bucket, path),
            )),
            Err(e) => Err(SplitError::transfer(format!("{}/{}", self.bucket, path), e)),
        }
    }

    /// Write a whole object, replacing whatever is there
    pub async fn write(&self, path: &str, data: Vec<u8>) -> Result<()> {
        self.operator
            .write(path, data)
            .await
            .map_err(|e| SplitError::transfer(format!("{}/{}", self.bucket, path), e))?;
        Ok(())
    }

    /// Check if an object exists
    pub async fn exists(&self, path: &str) -> Result<bool> {
        match self.operator.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SplitError::transfer(format!("{}/{}", self.bucket, path), e)),
        }
    }
}
