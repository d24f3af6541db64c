//! Portal window state.
//!
//! The blob list, selection and status line live here and are only mutated
//! through [`PortalState::update`]. Each event returns the effect the window
//! has to perform next; remote effects come back as another event once the
//! blob worker finishes them.

use std::path::{Path, PathBuf};

use crate::services::paths;

/// Severity of a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

/// A modal dialog to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(level: AlertLevel, title: &str, message: String) -> Self {
        Self {
            level,
            title: title.to_string(),
            message,
        }
    }

    /// The download succeeded but the file manager could not be launched.
    pub fn open_folder_failed(dir: &Path, error: &str) -> Self {
        Self::new(
            AlertLevel::Info,
            "Open Folder Failed",
            format!(
                "Downloaded successfully, but couldn't open the folder automatically.\n\nPath: {}\n\n{}",
                dir.display(),
                error
            ),
        )
    }
}

/// Input to the portal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    /// The user asked for a fresh listing (also sent at startup).
    RefreshRequested,
    /// A listing finished.
    BlobsListed(Result<Vec<String>, String>),
    /// A list row was clicked.
    BlobSelected(usize),
    /// Move the selection by one row.
    SelectNext,
    SelectPrevious,
    /// The user asked to download the selected blob.
    DownloadRequested,
    /// A download finished.
    DownloadFinished {
        path: PathBuf,
        result: Result<u64, String>,
    },
    /// The file picker returned a file to upload.
    UploadPicked(PathBuf),
    /// An upload finished. `result` holds the blob name on success.
    UploadFinished { result: Result<String, String> },
}

/// What the window must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEffect {
    None,
    /// Enumerate the container.
    ListBlobs,
    /// Upload a local file.
    Upload(PathBuf),
    /// Download a blob to a local path.
    Download { blob_name: String, path: PathBuf },
    /// Reveal the download directory.
    OpenFolder(PathBuf),
    /// Show a modal dialog.
    ShowAlert(Alert),
}

impl PortalEffect {
    /// Whether this effect runs against the container on the blob worker.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            PortalEffect::ListBlobs | PortalEffect::Upload(_) | PortalEffect::Download { .. }
        )
    }
}

/// State behind the portal window.
#[derive(Debug, Clone)]
pub struct PortalState {
    container_name: String,
    download_dir: PathBuf,
    items: Vec<String>,
    selected: Option<usize>,
    status: String,
    busy: bool,
}

impl PortalState {
    pub fn new(container_name: String, download_dir: PathBuf) -> Self {
        Self {
            container_name,
            download_dir,
            items: vec![],
            selected: None,
            status: String::new(),
            busy: false,
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Blob names from the last successful listing.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_blob(&self) -> Option<&str> {
        self.selected
            .and_then(|ix| self.items.get(ix))
            .map(String::as_str)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// True while a blob operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Apply an event and return the next effect.
    pub fn update(&mut self, event: PortalEvent) -> PortalEffect {
        match event {
            PortalEvent::RefreshRequested => {
                if self.busy {
                    tracing::debug!("Refresh ignored, an operation is in flight");
                    return PortalEffect::None;
                }
                self.begin("Loading blob list...".to_string());
                PortalEffect::ListBlobs
            }
            PortalEvent::BlobsListed(Ok(names)) => {
                self.busy = false;
                self.items = names;
                self.selected = None;
                self.status = format!("Loaded blob list from '{}'.", self.container_name);
                PortalEffect::None
            }
            PortalEvent::BlobsListed(Err(message)) => self.fail(
                "Error",
                format!("Failed to load blob list:\n{}", message),
            ),
            PortalEvent::BlobSelected(ix) => {
                if ix < self.items.len() {
                    self.selected = Some(ix);
                }
                PortalEffect::None
            }
            PortalEvent::SelectNext => {
                if !self.items.is_empty() {
                    let next = self.selected.map_or(0, |ix| ix + 1);
                    self.selected = Some(next.min(self.items.len() - 1));
                }
                PortalEffect::None
            }
            PortalEvent::SelectPrevious => {
                if !self.items.is_empty() {
                    self.selected = Some(self.selected.map_or(0, |ix| ix.saturating_sub(1)));
                }
                PortalEffect::None
            }
            PortalEvent::DownloadRequested => {
                if self.busy {
                    return PortalEffect::None;
                }
                let Some(blob_name) = self.selected_blob().map(str::to_string) else {
                    return PortalEffect::ShowAlert(Alert::new(
                        AlertLevel::Warning,
                        "No Selection",
                        "Please select a file to download.".to_string(),
                    ));
                };

                match paths::download_path(&self.download_dir, &blob_name) {
                    Ok(path) => {
                        self.begin(format!("Downloading '{}'...", blob_name));
                        PortalEffect::Download { blob_name, path }
                    }
                    Err(e) => PortalEffect::ShowAlert(Alert::new(
                        AlertLevel::Error,
                        "Download Error",
                        format!("Failed to download:\n{}", e),
                    )),
                }
            }
            PortalEvent::DownloadFinished { path, result: Ok(_) } => {
                self.busy = false;
                self.status = format!("Downloaded to {}", path.display());
                PortalEffect::OpenFolder(self.download_dir.clone())
            }
            PortalEvent::DownloadFinished {
                result: Err(message),
                ..
            } => self.fail("Download Error", format!("Failed to download:\n{}", message)),
            PortalEvent::UploadPicked(path) => {
                if self.busy {
                    return PortalEffect::None;
                }
                let file_name = display_file_name(&path);
                self.begin(format!("Uploading '{}'...", file_name));
                PortalEffect::Upload(path)
            }
            PortalEvent::UploadFinished { result: Ok(_) } => {
                // Stay busy: the listing that follows clears it.
                self.status = "Upload successful.".to_string();
                PortalEffect::ListBlobs
            }
            PortalEvent::UploadFinished {
                result: Err(message),
            } => self.fail("Upload Error", format!("Failed to upload:\n{}", message)),
        }
    }

    fn begin(&mut self, status: String) {
        self.busy = true;
        self.status = status;
    }

    fn fail(&mut self, title: &str, message: String) -> PortalEffect {
        self.busy = false;
        self.status.clear();
        PortalEffect::ShowAlert(Alert::new(AlertLevel::Error, title, message))
    }
}

/// File name shown in status messages.
fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
