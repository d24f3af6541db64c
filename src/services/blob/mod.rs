//! Blob container access.
//!
//! A thin wrapper over Apache OpenDAL exposing the three operations the
//! portal needs: list, upload and download.
//!
//! Supported backends:
//!
//! - **Azure Blob Storage** authenticated with a container SAS token
//! - **Local Filesystem** for development and testing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BlobServiceFactory                       │
//! │  - Validates the ContainerRef                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              OpendalContainer (BlobContainer)               │
//! │  - azblob + SAS token, or fs                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       BlobWorker                            │
//! │  - tokio runtime the UI hands transfers to                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use magic_portal::services::blob::{BlobServiceFactory, ContainerRef};
//!
//! let container = BlobServiceFactory::create(ContainerRef::azblob(
//!     "https://myaccount.blob.core.windows.net/".to_string(),
//!     "?sv=2022-11-02&ss=b&sig=...".to_string(),
//!     "uploads".to_string(),
//! ))?;
//!
//! for name in container.list_blobs().await? {
//!     println!("{name}");
//! }
//! ```

mod container;
mod factory;
mod traits;
mod types;
mod worker;

pub use factory::BlobServiceFactory;
pub use traits::{BlobContainer, SharedBlobContainer};
pub use types::{ContainerRef, StorageBackend};
pub use worker::BlobWorker;
