//! Blob container factory.
//!
//! Creates the container connection matching a container reference's
//! backend.

use anyhow::Result;

use super::container::OpendalContainer;
use super::traits::SharedBlobContainer;
use super::types::{ContainerRef, StorageBackend};

/// Factory for creating container connections from a container reference.
pub struct BlobServiceFactory;

impl BlobServiceFactory {
    /// Create a new container connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is invalid for its backend or the
    /// operator cannot be built from it.
    pub fn create(container: ContainerRef) -> Result<SharedBlobContainer> {
        container.validate()?;

        tracing::info!(
            "Opening {} container {}",
            container.backend,
            container.display_uri()
        );

        match container.backend {
            StorageBackend::Azblob | StorageBackend::Fs => OpendalContainer::shared(container),
        }
    }
}
