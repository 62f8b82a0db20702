//! # seva-storage
//!
//! Durable storage for photos attached to issue reports.
//!
//! Objects are written to `issues/{owner_id}/{file_name}` in one of three
//! backends selected by [`StorageConfig`]: the local filesystem, an
//! in-memory store, or any S3-compatible service. Upload returns a fetch URL
//! built from the configured public base URL. There is no size or type
//! validation and no delete path.

mod error;

pub use error::StorageError;

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use seva_config::{StorageBackend, StorageConfig};

/// Top-level prefix for issue photos.
pub const ISSUES_PREFIX: &str = "issues";

/// A photo attached to a new report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Handle to the configured object store. Cheap to clone.
#[derive(Clone)]
pub struct ImageStore {
    store: Arc<dyn ObjectStore>,
    base_url: String,
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("store", &self.store.to_string())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ImageStore {
    /// Wrap an existing store. `base_url` is the prefix of returned URLs.
    pub fn new(store: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    /// Build the store selected by `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotConfigured` if the backend lacks required
    /// fields, `StorageError::Io` if the local root cannot be created, or
    /// `StorageError::ObjectStore` if the S3 client cannot be built.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        if !config.is_configured() {
            return Err(StorageError::NotConfigured(format!(
                "{:?} backend is missing required fields",
                config.backend
            )));
        }
        let base_url = config.base_url();
        match config.backend {
            StorageBackend::Memory => Ok(Self::new(Arc::new(InMemory::new()), base_url)),
            StorageBackend::Local => {
                std::fs::create_dir_all(&config.root)?;
                let fs = LocalFileSystem::new_with_prefix(&config.root)?;
                Ok(Self::new(Arc::new(fs), base_url))
            }
            StorageBackend::S3 => {
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&config.bucket)
                    .with_region(&config.region)
                    .with_access_key_id(&config.access_key_id)
                    .with_secret_access_key(&config.secret_access_key);
                if !config.endpoint.is_empty() {
                    builder = builder
                        .with_endpoint(&config.endpoint)
                        .with_allow_http(config.endpoint.starts_with("http://"));
                }
                Ok(Self::new(Arc::new(builder.build()?), base_url))
            }
        }
    }

    /// In-memory store with `memory://seva` URLs, for tests and dry runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory://seva")
    }

    /// Object path for an issue photo.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` when either segment is empty or
    /// contains a `/`.
    pub fn object_path(owner_id: &str, file_name: &str) -> Result<Path, StorageError> {
        for (label, segment) in [("owner id", owner_id), ("file name", file_name)] {
            if segment.is_empty() || segment.contains('/') {
                return Err(StorageError::InvalidPath(format!(
                    "{label} must be a single non-empty segment, got {segment:?}"
                )));
            }
        }
        Ok(Path::from_iter([ISSUES_PREFIX, owner_id, file_name]))
    }

    /// Public fetch URL for a stored object path.
    #[must_use]
    pub fn url_for(&self, path: &Path) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Write `bytes` to `issues/{owner_id}/{file_name}` and return its URL.
    ///
    /// Overwrites any existing object at the same path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for bad segments or
    /// `StorageError::ObjectStore` when the write fails.
    pub async fn upload_issue_image(
        &self,
        owner_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let path = Self::object_path(owner_id, file_name)?;
        let size = bytes.len();
        self.store.put(&path, PutPayload::from(bytes)).await?;
        tracing::debug!(%path, size, "uploaded issue image");
        Ok(self.url_for(&path))
    }

    /// Read an object back. Used by tests and the CLI.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ObjectStore` if the object is missing or
    /// unreadable.
    pub async fn fetch(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        let bytes = self.store.get(path).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn in_memory_upload_returns_url_and_stores_bytes() {
        let store = ImageStore::in_memory();
        let url = store
            .upload_issue_image("usr-00000001", "pothole.jpg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "memory://seva/issues/usr-00000001/pothole.jpg");

        let path = ImageStore::object_path("usr-00000001", "pothole.jpg").unwrap();
        assert_eq!(store.fetch(&path).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn same_path_overwrites() {
        let store = ImageStore::in_memory();
        store.upload_issue_image("guest", "a.jpg", vec![1]).await.unwrap();
        store.upload_issue_image("guest", "a.jpg", vec![2]).await.unwrap();
        let path = ImageStore::object_path("guest", "a.jpg").unwrap();
        assert_eq!(store.fetch(&path).await.unwrap(), vec![2]);
    }

    #[test]
    fn nested_segments_are_rejected() {
        assert!(ImageStore::object_path("guest", "../a.jpg").is_err());
        assert!(ImageStore::object_path("", "a.jpg").is_err());
    }

    #[tokio::test]
    async fn local_backend_writes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        let config = StorageConfig {
            root: root.to_string_lossy().into_owned(),
            public_base_url: "https://img.example.org/".into(),
            ..StorageConfig::default()
        };
        let store = ImageStore::from_config(&config).unwrap();
        let url = store
            .upload_issue_image("guest", "leak.png", b"png".to_vec())
            .await
            .unwrap();
        assert_eq!(url, "https://img.example.org/issues/guest/leak.png");
        assert!(root.join("issues/guest/leak.png").exists());
    }

    #[tokio::test]
    async fn local_backend_rooted_at_a_file_fails_upload() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let fs = LocalFileSystem::new_with_prefix(file.path()).unwrap();
        let store = ImageStore::new(Arc::new(fs), "file://broken");
        let err = store
            .upload_issue_image("guest", "a.jpg", vec![0])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ObjectStore(_)));
    }
}
