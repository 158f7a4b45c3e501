use async_trait::async_trait;

use crate::application::ports::{TranscodeError, Transcoder};
use crate::domain::{AudioArtifact, WAV_MIME};

/// Returns a small memory-backed WAV artifact without invoking any engine.
pub struct MockTranscoder;

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(&self, input: &AudioArtifact) -> Result<AudioArtifact, TranscodeError> {
        let _ = input.read_bytes().await?;
        Ok(AudioArtifact::from_bytes(vec![0u8; 64], WAV_MIME))
    }
}

/// Fails every call the way a crashed engine does.
pub struct FailingTranscoder;

#[async_trait]
impl Transcoder for FailingTranscoder {
    async fn transcode(&self, _input: &AudioArtifact) -> Result<AudioArtifact, TranscodeError> {
        Err(TranscodeError::EngineFailed(
            "engine exited with status 1".to_string(),
        ))
    }
}
