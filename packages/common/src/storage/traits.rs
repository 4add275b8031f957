use async_trait::async_trait;

use super::error::StorageError;

/// Key-addressed object storage holding document bytes.
///
/// The metadata row in the database is the only pointer to an object; the
/// store itself has no index of its own. Keys are namespaced by owner by the
/// caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under the given key, replacing any existing object.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Delete the object under the given key.
    ///
    /// Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Produce a time-limited retrieval URL for the object.
    ///
    /// `download_name`, when set, is carried as a content-disposition filename
    /// so the browser's save dialog shows the original name.
    async fn presign_get(
        &self,
        key: &str,
        expiry_secs: u32,
        download_name: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Public location of the object (bucket URL + key), if the backend has one.
    fn location(&self, key: &str) -> Option<String>;
}
