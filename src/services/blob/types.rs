//! Blob container types.
//!
//! This module contains:
//! - `StorageBackend` - which OpenDAL service backs the container
//! - `ContainerRef` - endpoint, SAS token and container name for one container

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Supported container backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Azure Blob Storage, authenticated with a SAS token
    #[default]
    Azblob,
    /// A local directory standing in for a container
    Fs,
}

impl StorageBackend {
    /// Get the display name for this backend.
    pub fn display_name(&self) -> &'static str {
        match self {
            StorageBackend::Azblob => "Azure Blob Storage",
            StorageBackend::Fs => "Local Filesystem",
        }
    }

    /// Check if this backend needs a SAS token.
    pub fn requires_credentials(&self) -> bool {
        match self {
            StorageBackend::Azblob => true,
            StorageBackend::Fs => false,
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reference to a single remote container.
///
/// Built once at startup and never mutated afterwards. For the `Fs` backend
/// `endpoint` is a directory and the container is a sub-directory of it.
#[derive(Clone, PartialEq, Eq)]
pub struct ContainerRef {
    pub backend: StorageBackend,
    pub endpoint: String,
    pub sas_token: String,
    pub container: String,
}

impl ContainerRef {
    /// Create an Azure Blob container reference.
    pub fn azblob(endpoint: String, sas_token: String, container: String) -> Self {
        Self {
            backend: StorageBackend::Azblob,
            endpoint,
            sas_token,
            container,
        }
    }

    /// Create a local directory container reference.
    pub fn local_fs(root: PathBuf, container: String) -> Self {
        Self {
            backend: StorageBackend::Fs,
            endpoint: root.display().to_string(),
            sas_token: String::new(),
            container,
        }
    }

    /// Validate the reference for its backend.
    pub fn validate(&self) -> Result<()> {
        if self.container.trim().is_empty() {
            return Err(anyhow!("Container name is required"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!("Storage endpoint is required"));
        }

        match self.backend {
            StorageBackend::Azblob => {
                let url = Url::parse(self.endpoint.trim())
                    .map_err(|e| anyhow!("Invalid account URL '{}': {}", self.endpoint, e))?;
                if url.scheme() != "https" && url.scheme() != "http" {
                    return Err(anyhow!(
                        "Account URL must use http or https, got '{}'",
                        url.scheme()
                    ));
                }
            }
            StorageBackend::Fs => {}
        }

        if self.backend.requires_credentials() && self.sas_token().is_empty() {
            return Err(anyhow!("SAS token is required for {}", self.backend));
        }
        Ok(())
    }

    /// Account endpoint without a trailing slash, as OpenDAL expects it.
    pub fn account_endpoint(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }

    /// SAS token without the leading `?` the portal hands out.
    pub fn sas_token(&self) -> &str {
        self.sas_token.trim().trim_start_matches('?')
    }

    /// Root directory of a local container.
    pub fn local_root(&self) -> PathBuf {
        PathBuf::from(self.endpoint.trim()).join(self.container.trim())
    }

    /// Human readable location, safe to log.
    pub fn display_uri(&self) -> String {
        match self.backend {
            StorageBackend::Azblob => format!("{}/{}", self.account_endpoint(), self.container),
            StorageBackend::Fs => format!("file://{}", self.local_root().display()),
        }
    }
}

impl std::fmt::Debug for ContainerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRef")
            .field("backend", &self.backend)
            .field("endpoint", &self.endpoint)
            .field("sas_token", &"<redacted>")
            .field("container", &self.container)
            .finish()
    }
}
