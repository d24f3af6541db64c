//! Download directory resolution.

use anyhow::{anyhow, Context, Result};
use std::path::{Component, Path, PathBuf};

/// Directory name used under the home directory on non-Windows hosts.
const DOWNLOAD_DIR_NAME: &str = "magic-portal";

/// Get the download directory for the current OS.
///
/// `C:\Magic Portal` on Windows, `<home>/magic-portal` elsewhere.
pub fn default_download_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        Ok(PathBuf::from(r"C:\Magic Portal"))
    } else {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(DOWNLOAD_DIR_NAME))
    }
}

/// Create the download directory if it does not exist yet.
pub fn ensure_download_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download directory {}", dir.display()))
}

/// Local path a blob is downloaded to.
///
/// Blob names may contain `/` for virtual folders; those become
/// sub-directories. Names that would escape the download directory are
/// rejected.
pub fn download_path(dir: &Path, blob_name: &str) -> Result<PathBuf> {
    let relative = Path::new(blob_name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if blob_name.is_empty() || escapes {
        return Err(anyhow!(
            "Blob name '{}' cannot be saved inside {}",
            blob_name,
            dir.display()
        ));
    }

    Ok(dir.join(relative))
}
