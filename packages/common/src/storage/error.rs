use thiserror::Error;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),
    /// The storage backend rejected the request or was unreachable.
    #[error("storage backend error: {0}")]
    Backend(String),
}
