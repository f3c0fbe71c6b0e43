//! Blob-store capability: managed file storage addressed by path.
//!
//! Paths are forward-slash separated (`avatars/{uid}`,
//! `tweets/{uid}/{tweet_id}`); uploading to an existing path overwrites it.

use crate::Result;

#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Upload bytes to a path, replacing any prior blob there.
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Publicly fetchable URL for the blob at `path`.
    async fn download_url(&self, path: &str) -> Result<String>;

    /// Delete the blob at `path`.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Paths of all blobs under a prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
