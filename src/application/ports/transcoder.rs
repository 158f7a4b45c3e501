use std::time::Duration;

use async_trait::async_trait;

use crate::domain::AudioArtifact;

/// Converts one uploaded artifact into one decoded artifact in the fixed
/// target format (16 kHz mono 16-bit PCM WAV). Implementations enforce a
/// wall-clock timeout, terminate the in-flight operation when it is
/// exceeded, and never leave partial output artifacts behind.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, input: &AudioArtifact) -> Result<AudioArtifact, TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("transcoding timed out after {0:?}")]
    Timeout(Duration),
    #[error("transcoding engine failed: {0}")]
    EngineFailed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
