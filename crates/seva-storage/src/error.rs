//! Storage error types.

/// Errors raised while writing issue photos.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The object store rejected the operation.
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// Owner id or file name cannot form a valid object path.
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    /// The local root directory could not be prepared.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured backend is missing required settings.
    #[error("Storage not configured: {0}")]
    NotConfigured(String),
}
