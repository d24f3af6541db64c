//! Opening a folder in the host's file manager.

use anyhow::{anyhow, Context, Result};
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

/// File manager program for an OS name as reported by `std::env::consts::OS`.
pub fn file_manager_for(os: &str) -> Option<&'static str> {
    match os {
        "windows" => Some("explorer.exe"),
        "linux" | "freebsd" | "openbsd" | "netbsd" => Some("xdg-open"),
        "macos" => Some("open"),
        _ => None,
    }
}

/// Open `dir` in the native file manager.
///
/// Returns once the process is started. Callers treat failure as
/// informational.
pub fn open_folder(dir: &Path) -> Result<()> {
    let os = std::env::consts::OS;
    let program = file_manager_for(os)
        .ok_or_else(|| anyhow!("Opening folders is not supported on {}", os))?;

    let mut command = Command::new(program);
    command.arg(dir);
    spawn_reaped(command).with_context(|| format!("Failed to launch {}", program))?;

    tracing::debug!("Opened {} with {}", dir.display(), program);
    Ok(())
}

/// Start `command` and wait for it on a background thread so the child never
/// lingers as a zombie. The handle yields the exit status once reaped.
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command.spawn()?;
    let program = command.get_program().to_string_lossy().into_owned();

    thread::Builder::new()
        .name("folder-opener".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => {
                if !status.success() {
                    tracing::debug!("{} exited with {}", program, status);
                }
                Some(status)
            }
            Err(e) => {
                tracing::debug!("Failed to wait for {}: {}", program, e);
                None
            }
        })
}
