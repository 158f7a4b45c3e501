use std::time::Duration;

use async_trait::async_trait;

use crate::domain::AudioArtifact;

/// Sends one decoded artifact to a speech-to-text provider and awaits one
/// terminal result. An empty `Ok` string means the provider detected no
/// speech. Implementations must check required configuration before any
/// network call and must close/acknowledge provider sessions and jobs
/// exactly once on every exit path.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio: &AudioArtifact) -> Result<String, RecognitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("missing provider configuration: {0}")]
    MissingConfig(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("recognition timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport: {0}")]
    Transport(String),
}
