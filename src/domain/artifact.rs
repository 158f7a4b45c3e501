use std::path::{Path, PathBuf};

#[derive(Debug)]
enum Backing {
    Memory(Vec<u8>),
    TempFile(PathBuf),
}

/// Ownership wrapper around one audio artifact: either the raw upload bytes
/// held in memory, or a decoded temp file on disk.
///
/// Every artifact belongs to exactly one pipeline run. `release` is
/// idempotent and never fails; a file that is already gone counts as
/// released. `Drop` cleans up file-backed artifacts that were never
/// explicitly released, so no exit path can leak a temp file.
#[derive(Debug)]
pub struct AudioArtifact {
    backing: Option<Backing>,
    media_type: String,
    size_bytes: u64,
}

impl AudioArtifact {
    pub fn from_bytes(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        let size_bytes = data.len() as u64;
        Self {
            backing: Some(Backing::Memory(data)),
            media_type: media_type.into(),
            size_bytes,
        }
    }

    pub fn from_temp_file(path: PathBuf, media_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            backing: Some(Backing::TempFile(path)),
            media_type: media_type.into(),
            size_bytes,
        }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }

    /// Path of the backing temp file, if this artifact lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Some(Backing::TempFile(path)) => Some(path.as_path()),
            _ => None,
        }
    }

    pub fn is_released(&self) -> bool {
        self.backing.is_none()
    }

    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.backing {
            Some(Backing::Memory(data)) => Ok(data.clone()),
            Some(Backing::TempFile(path)) => tokio::fs::read(path).await,
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "artifact already released",
            )),
        }
    }

    /// Release the backing resource. Safe to call more than once; a missing
    /// file is treated as success. Cleanup problems are logged, never raised.
    pub async fn release(&mut self) {
        match self.backing.take() {
            Some(Backing::Memory(_)) => {}
            Some(Backing::TempFile(path)) => match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "temp artifact removed");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "temp artifact already gone");
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "failed to remove temp artifact");
                }
            },
            None => {}
        }
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if let Some(Backing::TempFile(path)) = self.backing.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = %e, path = %path.display(), "failed to remove temp artifact on drop");
                }
            }
        }
    }
}
