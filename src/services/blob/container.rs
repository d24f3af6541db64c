//! Blob container implementation using OpenDAL.
//!
//! Azure Blob Storage is reached through OpenDAL's `azblob` service with a
//! SAS token. The `fs` service backs local containers for development and
//! tests; both go through the same operator code.

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use futures::{AsyncReadExt as _, AsyncWriteExt as _, TryStreamExt as _};
use opendal::layers::LoggingLayer;
use opendal::services::{Azblob, Fs};
use opendal::{EntryMode, Operator};
use std::path::Path;
use std::sync::Arc;

use super::traits::{BlobContainer, SharedBlobContainer};
use super::types::{ContainerRef, StorageBackend};

/// Size of each block handed to the remote writer.
const UPLOAD_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Size of the local read buffer while uploading.
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Container connection backed by an OpenDAL operator.
pub struct OpendalContainer {
    container: ContainerRef,
    operator: Operator,
}

impl OpendalContainer {
    /// Create a new container connection.
    ///
    /// No request is sent; credentials are only exercised by the first
    /// operation.
    pub fn new(container: ContainerRef) -> Result<Self> {
        let operator = Self::build_operator(&container)?;
        Ok(Self {
            container,
            operator,
        })
    }

    /// Create a shared container connection.
    pub fn shared(container: ContainerRef) -> Result<SharedBlobContainer> {
        Ok(Arc::new(Self::new(container)?))
    }

    /// Build the OpenDAL operator.
    fn build_operator(container: &ContainerRef) -> Result<Operator> {
        let op = match container.backend {
            StorageBackend::Azblob => {
                let builder = Azblob::default()
                    .endpoint(container.account_endpoint())
                    .container(container.container.trim())
                    .sas_token(container.sas_token());

                Operator::new(builder)?
                    .layer(LoggingLayer::default())
                    .finish()
            }
            StorageBackend::Fs => {
                let root = container.local_root();
                let builder = Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| anyhow!("Invalid path encoding"))?,
                );

                Operator::new(builder)?
                    .layer(LoggingLayer::default())
                    .finish()
            }
        };

        Ok(op)
    }

    /// Remote key for a local file: its base name, path stripped.
    pub fn blob_name_for(local_path: &Path) -> Result<String> {
        local_path
            .file_name()
            .ok_or_else(|| anyhow!("'{}' is not a file path", local_path.display()))?
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("File name of '{}' is not valid UTF-8", local_path.display()))
    }

    /// Directory markers are not blobs.
    fn is_blob_entry(path: &str, mode: EntryMode) -> bool {
        mode != EntryMode::DIR && !path.is_empty() && !path.ends_with('/')
    }
}

#[async_trait]
impl BlobContainer for OpendalContainer {
    fn container_ref(&self) -> &ContainerRef {
        &self.container
    }

    async fn list_blobs(&self) -> Result<Vec<String>> {
        let mut lister = self.operator.lister_with("").recursive(true).await?;

        let mut names = Vec::new();
        while let Some(entry) = lister.try_next().await? {
            if Self::is_blob_entry(entry.path(), entry.metadata().mode()) {
                names.push(entry.path().to_string());
            }
        }

        tracing::debug!(
            "Listed {} blobs from {}",
            names.len(),
            self.container.display_uri()
        );
        Ok(names)
    }

    async fn upload_file(&self, local_path: &Path) -> Result<String> {
        let name = Self::blob_name_for(local_path)?;

        let mut file = async_fs::File::open(local_path)
            .await
            .with_context(|| format!("Failed to open '{}'", local_path.display()))?;

        let mut writer = self
            .operator
            .writer_with(&name)
            .chunk(UPLOAD_CHUNK_SIZE)
            .await?;

        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let mut uploaded: u64 = 0;
        loop {
            let n = file
                .read(&mut buf)
                .await
                .with_context(|| format!("Failed to read '{}'", local_path.display()))?;
            if n == 0 {
                break;
            }
            writer.write(buf[..n].to_vec()).await?;
            uploaded += n as u64;
        }
        writer.close().await?;

        tracing::debug!("Uploaded {} bytes to blob '{}'", uploaded, name);
        Ok(name)
    }

    async fn download_file(&self, blob_name: &str, local_path: &Path) -> Result<u64> {
        let reader = self.operator.reader(blob_name).await?;
        let mut stream = reader.into_bytes_stream(..).await?;

        if let Some(parent) = local_path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }

        let mut file = async_fs::File::create(local_path)
            .await
            .with_context(|| format!("Failed to create '{}'", local_path.display()))?;

        let mut written: u64 = 0;
        while let Some(chunk) = stream.try_next().await? {
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write '{}'", local_path.display()))?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!("Downloaded {} bytes from blob '{}'", written, blob_name);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn local_container(dir: &TempDir) -> OpendalContainer {
        let container = ContainerRef::local_fs(dir.path().join("account"), "files".to_string());
        OpendalContainer::new(container).unwrap()
    }

    fn write_local(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join("outbox").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_blob_name_strips_directories() {
        assert_eq!(
            OpendalContainer::blob_name_for(Path::new("/home/me/reports/q3.pdf")).unwrap(),
            "q3.pdf"
        );
        assert_eq!(
            OpendalContainer::blob_name_for(Path::new("notes.txt")).unwrap(),
            "notes.txt"
        );
        assert!(OpendalContainer::blob_name_for(Path::new("/")).is_err());
        assert!(OpendalContainer::blob_name_for(Path::new("..")).is_err());
    }

    #[test]
    fn test_directory_markers_are_skipped() {
        assert!(OpendalContainer::is_blob_entry("a.txt", EntryMode::FILE));
        assert!(!OpendalContainer::is_blob_entry("logs/", EntryMode::DIR));
        assert!(!OpendalContainer::is_blob_entry("logs/", EntryMode::Unknown));
        assert!(!OpendalContainer::is_blob_entry("", EntryMode::FILE));
    }

    #[test]
    fn test_azblob_operator_builds_without_network() {
        let container = ContainerRef::azblob(
            "https://acct.blob.core.windows.net/".to_string(),
            "?sv=2022-11-02&sig=abc".to_string(),
            "files".to_string(),
        );
        assert!(OpendalContainer::new(container).is_ok());
    }

    #[tokio::test]
    async fn test_empty_container_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);

        assert!(container.list_blobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_uses_base_name_and_lists_once() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);
        let path = write_local(&dir, "report.csv", b"a,b\n1,2\n");

        let name = container.upload_file(&path).await.unwrap();
        assert_eq!(name, "report.csv");

        // Second upload overwrites instead of duplicating.
        std::fs::write(&path, b"a,b\n3,4\n").unwrap();
        container.upload_file(&path).await.unwrap();

        let names = container.list_blobs().await.unwrap();
        assert_eq!(names, vec!["report.csv".to_string()]);

        let stored = std::fs::read(dir.path().join("account/files/report.csv")).unwrap();
        assert_eq!(stored, b"a,b\n3,4\n");
    }

    #[tokio::test]
    async fn test_listing_reflects_container_contents() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);
        for name in ["one.txt", "two.txt", "three.txt"] {
            let path = write_local(&dir, name, name.as_bytes());
            container.upload_file(&path).await.unwrap();
        }
        std::fs::create_dir_all(dir.path().join("account/files/nested")).unwrap();
        std::fs::write(dir.path().join("account/files/nested/deep.bin"), b"x").unwrap();

        let mut names = container.list_blobs().await.unwrap();
        names.sort();
        assert_eq!(
            names,
            vec!["nested/deep.bin", "one.txt", "three.txt", "two.txt"]
        );
    }

    #[tokio::test]
    async fn test_download_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);
        let contents: Vec<u8> = (0..600_000u32).map(|i| (i % 251) as u8).collect();
        let path = write_local(&dir, "blob.bin", &contents);
        container.upload_file(&path).await.unwrap();

        let target = dir.path().join("downloads").join("blob.bin");
        let written = container.download_file("blob.bin", &target).await.unwrap();

        assert_eq!(written, contents.len() as u64);
        assert_eq!(std::fs::read(&target).unwrap(), contents);
    }

    #[tokio::test]
    async fn test_download_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);
        let path = write_local(&dir, "short.txt", b"short");
        container.upload_file(&path).await.unwrap();

        let target = dir.path().join("short.txt");
        std::fs::write(&target, b"a much longer previous body").unwrap();
        container.download_file("short.txt", &target).await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"short");
    }

    #[tokio::test]
    async fn test_download_missing_blob_fails() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);

        let target = dir.path().join("missing.txt");
        assert!(container.download_file("missing.txt", &target).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_missing_local_file_fails() {
        let dir = TempDir::new().unwrap();
        let container = local_container(&dir);

        let result = container
            .upload_file(&dir.path().join("does-not-exist.txt"))
            .await;
        assert!(result.is_err());
        assert!(container.list_blobs().await.unwrap().is_empty());
    }
}
