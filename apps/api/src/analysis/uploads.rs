//! Transient upload storage.
//!
//! Every saved resume is owned by a `SavedUpload` guard. The handler discards it right
//! after extraction and the guard deletes the file on drop otherwise, so nothing is
//! left behind once a request finishes.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

const DEFAULT_FILENAME: &str = "resume.pdf";
const MAX_FILENAME_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    /// Opens the directory, creating it if needed.
    pub async fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `data` under a request-unique name derived from the client's filename.
    pub async fn save(&self, filename: Option<&str>, data: &[u8]) -> io::Result<SavedUpload> {
        let name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_filename(filename.unwrap_or_default())
        );
        let upload = SavedUpload {
            path: self.root.join(name),
            removed: false,
        };
        tokio::fs::write(&upload.path, data).await?;
        debug!(path = %upload.path.display(), bytes = data.len(), "Upload saved");
        Ok(upload)
    }
}

#[derive(Debug)]
pub struct SavedUpload {
    path: PathBuf,
    removed: bool,
}

impl SavedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file now. On failure the guard retries on drop.
    pub async fn discard(mut self) -> io::Result<()> {
        let result = tokio::fs::remove_file(&self.path).await;
        self.removed = result.is_ok();
        result
    }
}

impl Drop for SavedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Upload removed on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "Failed to remove upload: {e}"),
        }
    }
}

/// Reduces a client-supplied filename to a single safe path component.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}
