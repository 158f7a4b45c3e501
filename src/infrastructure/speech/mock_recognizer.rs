use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::AudioArtifact;

/// Returns a fixed transcript. An empty transcript exercises the no-speech
/// path.
pub struct MockRecognizer {
    text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(&self, _audio: &AudioArtifact) -> Result<String, RecognitionError> {
        Ok(self.text.clone())
    }
}

/// Fails every call with a provider error.
pub struct FailingRecognizer;

#[async_trait]
impl SpeechRecognizer for FailingRecognizer {
    async fn recognize(&self, _audio: &AudioArtifact) -> Result<String, RecognitionError> {
        Err(RecognitionError::Provider(
            "mock provider rejected the audio".to_string(),
        ))
    }
}

/// Fails every call with a recognition timeout.
pub struct TimeoutRecognizer;

#[async_trait]
impl SpeechRecognizer for TimeoutRecognizer {
    async fn recognize(&self, _audio: &AudioArtifact) -> Result<String, RecognitionError> {
        Err(RecognitionError::Timeout(Duration::from_secs(15)))
    }
}
