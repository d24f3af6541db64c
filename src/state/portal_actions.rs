//! Portal actions.
//!
//! Runs the remote effects produced by [`PortalState`](super::PortalState)
//! against the container and turns their outcome into the event that
//! completes them.

use crate::services::blob::SharedBlobContainer;

use super::portal::{PortalEffect, PortalEvent};

/// Perform a remote effect. Returns `None` for effects that are not remote.
///
/// Errors are flattened to a single message, context chain included.
pub async fn perform(container: SharedBlobContainer, effect: PortalEffect) -> Option<PortalEvent> {
    match effect {
        PortalEffect::ListBlobs => {
            tracing::debug!("Listing container {}", container.container_ref().container);
            let result = container.list_blobs().await.map_err(|e| {
                tracing::error!("Failed to load blob list: {:#}", e);
                format!("{:#}", e)
            });
            if let Ok(names) = &result {
                tracing::info!("Loaded {} blobs", names.len());
            }
            Some(PortalEvent::BlobsListed(result))
        }
        PortalEffect::Upload(path) => {
            tracing::info!("Uploading {} (existing blob is overwritten)", path.display());
            let result = container.upload_file(&path).await.map_err(|e| {
                tracing::error!("Failed to upload {}: {:#}", path.display(), e);
                format!("{:#}", e)
            });
            Some(PortalEvent::UploadFinished { result })
        }
        PortalEffect::Download { blob_name, path } => {
            tracing::info!("Downloading '{}' to {}", blob_name, path.display());
            let result = container
                .download_file(&blob_name, &path)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to download '{}': {:#}", blob_name, e);
                    format!("{:#}", e)
                });
            Some(PortalEvent::DownloadFinished { path, result })
        }
        PortalEffect::None | PortalEffect::OpenFolder(_) | PortalEffect::ShowAlert(_) => None,
    }
}

/// Event completing a remote effect whose task never reported back.
pub fn abandoned(effect: &PortalEffect, message: String) -> Option<PortalEvent> {
    match effect {
        PortalEffect::ListBlobs => Some(PortalEvent::BlobsListed(Err(message))),
        PortalEffect::Upload(_) => Some(PortalEvent::UploadFinished {
            result: Err(message),
        }),
        PortalEffect::Download { path, .. } => Some(PortalEvent::DownloadFinished {
            path: path.clone(),
            result: Err(message),
        }),
        PortalEffect::None | PortalEffect::OpenFolder(_) | PortalEffect::ShowAlert(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::blob::{BlobContainer, BlobServiceFactory, ContainerRef};
    use crate::state::portal::{AlertLevel, PortalState};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Container whose every call fails, counting the attempts.
    struct FailingContainer {
        container: ContainerRef,
        calls: AtomicUsize,
    }

    impl FailingContainer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                container: ContainerRef::azblob(
                    "https://acct.blob.core.windows.net".to_string(),
                    "sig=expired".to_string(),
                    "files".to_string(),
                ),
                calls: AtomicUsize::new(0),
            })
        }

        fn fail(&self) -> anyhow::Error {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow!("Server failed to authenticate the request")
        }
    }

    #[async_trait]
    impl BlobContainer for FailingContainer {
        fn container_ref(&self) -> &ContainerRef {
            &self.container
        }

        async fn list_blobs(&self) -> Result<Vec<String>> {
            Err(self.fail())
        }

        async fn upload_file(&self, _local_path: &Path) -> Result<String> {
            Err(self.fail())
        }

        async fn download_file(&self, _blob_name: &str, _local_path: &Path) -> Result<u64> {
            Err(self.fail())
        }
    }

    /// Feed an event through the state, performing remote effects until a
    /// local one is reached.
    async fn drive(
        state: &mut PortalState,
        container: &SharedBlobContainer,
        event: PortalEvent,
    ) -> PortalEffect {
        let mut effect = state.update(event);
        while effect.is_remote() {
            let event = perform(container.clone(), effect).await.unwrap();
            effect = state.update(event);
        }
        effect
    }

    fn local_portal(dir: &TempDir) -> (PortalState, SharedBlobContainer) {
        let container = BlobServiceFactory::create(ContainerRef::local_fs(
            dir.path().join("account"),
            "files".to_string(),
        ))
        .unwrap();
        let state = PortalState::new("files".to_string(), dir.path().join("downloads"));
        (state, container)
    }

    #[tokio::test]
    async fn test_upload_refresh_download_round_trip() {
        let dir = TempDir::new().unwrap();
        let (mut state, container) = local_portal(&dir);

        let source = dir.path().join("picked").join("holiday.jpg");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, b"\xff\xd8\xff\xe0 jpeg bytes").unwrap();

        let effect = drive(&mut state, &container, PortalEvent::UploadPicked(source.clone())).await;
        assert_eq!(effect, PortalEffect::None);
        assert_eq!(state.items(), &["holiday.jpg".to_string()]);

        state.update(PortalEvent::BlobSelected(0));
        let effect = drive(&mut state, &container, PortalEvent::DownloadRequested).await;
        assert_eq!(effect, PortalEffect::OpenFolder(dir.path().join("downloads")));

        let downloaded = std::fs::read(dir.path().join("downloads").join("holiday.jpg")).unwrap();
        assert_eq!(downloaded, std::fs::read(&source).unwrap());
    }

    #[tokio::test]
    async fn test_failures_keep_list_and_report() {
        let dir = TempDir::new().unwrap();
        let (mut state, container) = local_portal(&dir);
        let source = dir.path().join("a.txt");
        std::fs::write(&source, b"a").unwrap();
        drive(&mut state, &container, PortalEvent::UploadPicked(source)).await;
        assert_eq!(state.items().len(), 1);

        let failing: SharedBlobContainer = FailingContainer::new();
        for event in [
            PortalEvent::RefreshRequested,
            PortalEvent::UploadPicked(dir.path().join("a.txt")),
        ] {
            let effect = drive(&mut state, &failing, event).await;
            match effect {
                PortalEffect::ShowAlert(alert) => {
                    assert_eq!(alert.level, AlertLevel::Error);
                    assert!(alert.message.contains("authenticate"));
                }
                other => panic!("expected an error dialog, got {:?}", other),
            }
            assert_eq!(state.items(), &["a.txt".to_string()]);
            assert!(!state.is_busy());
        }

        state.update(PortalEvent::BlobSelected(0));
        let effect = drive(&mut state, &failing, PortalEvent::DownloadRequested).await;
        assert!(matches!(effect, PortalEffect::ShowAlert(_)));
        assert_eq!(state.items(), &["a.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_download_without_selection_makes_no_call() {
        let failing = FailingContainer::new();
        let shared: SharedBlobContainer = failing.clone();
        let mut state = PortalState::new("files".to_string(), PathBuf::from("/downloads"));

        let effect = drive(&mut state, &shared, PortalEvent::DownloadRequested).await;

        assert!(matches!(effect, PortalEffect::ShowAlert(ref a) if a.level == AlertLevel::Warning));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_effects_are_not_performed() {
        let failing = FailingContainer::new();
        let shared: SharedBlobContainer = failing.clone();

        assert!(perform(shared.clone(), PortalEffect::None).await.is_none());
        assert!(
            perform(shared, PortalEffect::OpenFolder(PathBuf::from("/downloads")))
                .await
                .is_none()
        );
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_abandoned_effect_fails_its_operation() {
        let mut state = PortalState::new("files".to_string(), PathBuf::from("/downloads"));
        let effect = state.update(PortalEvent::RefreshRequested);

        let event = abandoned(&effect, "worker stopped".to_string()).unwrap();
        assert!(matches!(state.update(event), PortalEffect::ShowAlert(_)));
        assert!(!state.is_busy());

        assert!(abandoned(&PortalEffect::None, "unused".to_string()).is_none());
    }

    #[test]
    fn test_abandoned_download_reports_target_path() {
        let effect = PortalEffect::Download {
            blob_name: "a.txt".to_string(),
            path: PathBuf::from("/downloads/a.txt"),
        };

        assert_eq!(
            abandoned(&effect, "worker stopped".to_string()),
            Some(PortalEvent::DownloadFinished {
                path: PathBuf::from("/downloads/a.txt"),
                result: Err("worker stopped".to_string()),
            })
        );
        assert_eq!(
            abandoned(&PortalEffect::Upload(PathBuf::from("/tmp/a.txt")), "gone".to_string()),
            Some(PortalEvent::UploadFinished {
                result: Err("gone".to_string()),
            })
        );
    }
}
