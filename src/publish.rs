//! Publishing generated documents
//!
//! Moves a rendered file into the servable export directory and builds its
//! download URL. Also holds the best-effort file-opener capability; opening
//! the published file on the host is advisory only and never affects the
//! response.

use crate::error::{AccordError, Result};

use std::fs;
use std::path::{Path, PathBuf};

/// Moves generated files into the export directory and returns their URLs
pub struct FilePublisher {
    base_url: String,
    export_dir: String,
}

impl FilePublisher {
    /// Create a publisher for the given base address and export directory
    ///
    /// `export_dir` is a relative path that appears verbatim in the URL, so
    /// it should sit under the directory served as static content.
    pub fn new(base_url: impl Into<String>, export_dir: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            export_dir: export_dir.into(),
        }
    }

    /// Local path a filename will occupy once published
    pub fn export_path(&self, filename: &str) -> PathBuf {
        Path::new(&self.export_dir).join(filename)
    }

    /// Download URL for a published filename
    ///
    /// A plain path join of the base address, the export directory, and
    /// the filename; no authentication, no expiry.
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.export_dir.trim_matches('/'),
            filename
        )
    }

    /// Move a file into the export directory and return its download URL
    ///
    /// The export directory is created if absent. A missing source file is
    /// a silent no-op: the URL is still returned, and callers must not
    /// assume it is valid without checking.
    pub fn publish(&self, source: &Path) -> Result<String> {
        fs::create_dir_all(&self.export_dir).map_err(AccordError::Io)?;

        let filename = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let destination = self.export_path(&filename);

        if source.exists() {
            move_file(source, &destination)?;
            tracing::info!("Published {} -> {}", source.display(), destination.display());
        } else {
            tracing::warn!(
                "Publish source {} does not exist; returning URL anyway",
                source.display()
            );
        }

        Ok(self.download_url(&filename))
    }
}

/// Move a file, falling back to copy-and-remove across filesystems
fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if fs::rename(source, destination).is_err() {
        fs::copy(source, destination).map_err(AccordError::Io)?;
        fs::remove_file(source).map_err(AccordError::Io)?;
    }
    Ok(())
}

/// Best-effort capability for opening a file on the host
///
/// Fire-and-forget: implementations swallow every error, and nothing in the
/// request pipeline depends on this for correctness.
pub trait FileOpener: Send + Sync {
    /// Attempt to open the file with whatever the host provides
    fn open(&self, path: &Path);
}

/// Opens files with the host's native opener (`xdg-open`, `open`, `start`)
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) {
        let result = spawn_opener(path);
        if let Err(err) = result {
            tracing::debug!("Could not open {}: {}", path.display(), err);
        }
    }
}

#[cfg(target_os = "macos")]
fn spawn_opener(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("open").arg(path).spawn()?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn spawn_opener(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn()?;
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn spawn_opener(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("xdg-open").arg(path).spawn()?;
    Ok(())
}

/// Opener that does nothing, for tests and headless deployments
pub struct NoopOpener;

impl FileOpener for NoopOpener {
    fn open(&self, _path: &Path) {}
}
