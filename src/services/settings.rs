//! Application settings loaded from JSON files next to the executable.
//!
//! `appsettings.json` is required. `appsettings.local.json` is optional and
//! overrides any key it sets. Both use the layout:
//!
//! ```json
//! {
//!   "AzureBlob": {
//!     "AccountUrl": "https://myaccount.blob.core.windows.net/",
//!     "SasToken": "?sv=...",
//!     "ContainerName": "uploads"
//!   }
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::blob::{ContainerRef, StorageBackend};

/// Required settings file.
pub const SETTINGS_FILE: &str = "appsettings.json";
/// Optional override file.
pub const LOCAL_SETTINGS_FILE: &str = "appsettings.local.json";

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    #[serde(default)]
    pub azure_blob: AzureBlobSettings,
}

/// The `AzureBlob` section.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AzureBlobSettings {
    #[serde(default)]
    pub account_url: Option<String>,
    #[serde(default)]
    pub sas_token: Option<String>,
    #[serde(default)]
    pub container_name: Option<String>,
    /// Which service backs the container (`azblob` unless set)
    #[serde(default)]
    pub backend: StorageBackend,
}

impl std::fmt::Debug for AzureBlobSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureBlobSettings")
            .field("account_url", &self.account_url)
            .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
            .field("container_name", &self.container_name)
            .field("backend", &self.backend)
            .finish()
    }
}

impl AppSettings {
    /// Load settings from the directory holding the executable.
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&Self::base_dir()?)
    }

    /// Load settings from a specific directory.
    ///
    /// Fails if the required file is missing or either file is not valid
    /// JSON. A missing override file is ignored.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let required = dir.join(SETTINGS_FILE);
        let mut merged = Self::read_json(&required)
            .with_context(|| format!("Required settings file {} could not be read", required.display()))?;

        let local = dir.join(LOCAL_SETTINGS_FILE);
        if local.exists() {
            let overrides = Self::read_json(&local)?;
            merge_json(&mut merged, overrides);
            tracing::debug!("Applied settings overrides from {}", local.display());
        } else {
            tracing::debug!("No {} found, using {} only", LOCAL_SETTINGS_FILE, SETTINGS_FILE);
        }

        serde_json::from_value(merged).context("Settings do not match the expected layout")
    }

    fn read_json(path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", path.display()))
    }

    /// Directory the settings files are read from.
    pub fn base_dir() -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Could not locate the running executable")?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("Executable path has no parent directory"))
    }

    /// Build the container reference, failing on any missing required key.
    pub fn container_ref(&self) -> Result<ContainerRef> {
        let section = &self.azure_blob;
        let account_url = required(&section.account_url, "AccountUrl")?;
        let container_name = required(&section.container_name, "ContainerName")?;

        let container = match section.backend {
            StorageBackend::Azblob => ContainerRef::azblob(
                account_url,
                required(&section.sas_token, "SasToken")?,
                container_name,
            ),
            StorageBackend::Fs => ContainerRef::local_fs(PathBuf::from(account_url), container_name),
        };

        container.validate()?;
        Ok(container)
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(anyhow!("Missing required setting AzureBlob:{}", key)),
    }
}

/// Recursively overlay `overrides` onto `base`. Objects merge key by key;
/// any other value replaces what was there.
fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overrides) => *base = overrides,
    }
}
