//! Blob container trait.
//!
//! The single seam between the portal and the storage SDK. Every operation is
//! one attempt: no retries, no timeouts beyond the transport defaults, and no
//! checksum verification.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::types::ContainerRef;

/// Operations the portal performs against one container.
#[async_trait]
pub trait BlobContainer: Send + Sync {
    /// Get the container reference this connection was built from.
    fn container_ref(&self) -> &ContainerRef;

    /// List every blob name in the container.
    ///
    /// The whole container is enumerated with no pagination limit. Names are
    /// returned in the order the backend yields them.
    async fn list_blobs(&self) -> Result<Vec<String>>;

    /// Upload a local file under its base name.
    ///
    /// An existing blob with the same name is overwritten.
    ///
    /// # Returns
    ///
    /// The blob name the file was stored under.
    async fn upload_file(&self, local_path: &Path) -> Result<String>;

    /// Download a blob into `local_path`, creating or truncating the file.
    ///
    /// A failed transfer leaves whatever was written in place.
    async fn download_file(&self, blob_name: &str, local_path: &Path) -> Result<u64>;
}

/// A shared container connection for dynamic dispatch.
pub type SharedBlobContainer = Arc<dyn BlobContainer>;
