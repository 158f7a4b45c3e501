use std::sync::Arc;

use crate::application::ports::{RecognitionError, SpeechRecognizer, TranscodeError, Transcoder};
use crate::domain::{AudioArtifact, FailureKind, PipelineResult};

/// Pipeline orchestrator for one request:
/// `Validate -> Transcoding -> Recognizing -> Done`, strictly linear.
///
/// Every failure raised by a stage is converted into the failure taxonomy
/// here; no raw adapter error reaches the response layer. Both artifacts
/// (upload and decoded) are released on every exit path before the result
/// is returned, and no stage is ever retried.
pub struct RelayService {
    transcoder: Arc<dyn Transcoder>,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl RelayService {
    pub fn new(transcoder: Arc<dyn Transcoder>, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            transcoder,
            recognizer,
        }
    }

    #[tracing::instrument(skip(self, upload), fields(upload_bytes = upload.size_bytes()))]
    pub async fn run(&self, mut upload: AudioArtifact) -> PipelineResult {
        if upload.is_empty() {
            tracing::warn!("upload rejected: no audio bytes");
            upload.release().await;
            return PipelineResult::Failed {
                kind: FailureKind::NoFile,
                message: None,
            };
        }

        let result = self.transcode_and_recognize(&upload).await;
        upload.release().await;
        result
    }

    async fn transcode_and_recognize(&self, upload: &AudioArtifact) -> PipelineResult {
        let mut decoded = match self.transcoder.transcode(upload).await {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!(error = %e, "transcoding stage failed");
                return Self::transcode_failure(e);
            }
        };

        tracing::debug!(decoded_bytes = decoded.size_bytes(), "transcoding completed");

        let result = match self.recognizer.recognize(&decoded).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::info!("recognition completed with no speech");
                    PipelineResult::NoSpeech
                } else {
                    tracing::info!(chars = text.len(), "recognition completed");
                    PipelineResult::Recognized(text.to_string())
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "recognition stage failed");
                Self::recognition_failure(e)
            }
        };

        decoded.release().await;
        result
    }

    fn transcode_failure(error: TranscodeError) -> PipelineResult {
        let kind = match &error {
            TranscodeError::Timeout(_) => FailureKind::TranscodeTimeout,
            TranscodeError::EngineFailed(_) => FailureKind::TranscodeFailed,
            TranscodeError::Io(_) => FailureKind::InternalError,
        };
        PipelineResult::failed(kind, error.to_string())
    }

    fn recognition_failure(error: RecognitionError) -> PipelineResult {
        let kind = match &error {
            RecognitionError::MissingConfig(_) => FailureKind::ConfigError,
            RecognitionError::Timeout(_) => FailureKind::RecognitionTimeout,
            RecognitionError::Provider(_) | RecognitionError::Transport(_) => {
                FailureKind::ProviderError
            }
        };
        PipelineResult::failed(kind, error.to_string())
    }
}
