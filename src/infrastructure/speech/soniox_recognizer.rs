use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::AudioArtifact;

pub const DEFAULT_SONIOX_BASE_URL: &str = "https://api.soniox.com";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Submit-and-poll recognizer against the Soniox async REST API: upload the
/// WAV, create a transcription job, poll its status at a fixed interval up
/// to a bounded attempt count, then fetch the transcript. Every HTTP call
/// carries the per-request timeout, so a stalled provider cannot hold the
/// pipeline past the attempt budget. The uploaded file is deleted exactly
/// once on every exit path; a terminal `error` status stops polling
/// immediately.
pub struct SonioxRecognizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
    request_timeout: Duration,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl SonioxRecognizer {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        language: &str,
        request_timeout: Duration,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build bounded HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            language: language.to_string(),
            request_timeout,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// A timed-out call surfaces as `Timeout` so it reaches the wire as one;
    /// malformed payloads stay provider errors, everything else is transport.
    fn request_error(&self, context: &str, e: reqwest::Error) -> RecognitionError {
        if e.is_timeout() {
            RecognitionError::Timeout(self.request_timeout)
        } else if e.is_decode() {
            RecognitionError::Provider(format!("{}: {}", context, e))
        } else {
            RecognitionError::Transport(format!("{}: {}", context, e))
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RecognitionError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(RecognitionError::Provider(format!(
            "status {}: {}",
            status, body
        )))
    }

    async fn upload_file(&self, wav: Vec<u8>) -> Result<String, RecognitionError> {
        let part = multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::Transport(format!("mime: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/v1/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error("upload", e))?;
        let response = Self::ensure_success(response).await?;

        let payload: FileUploadResponse = response
            .json()
            .await
            .map_err(|e| self.request_error("parse upload response", e))?;

        tracing::debug!(file_id = %payload.id, "Soniox file uploaded");
        Ok(payload.id)
    }

    async fn create_transcription(&self, file_id: &str) -> Result<String, RecognitionError> {
        let request = CreateTranscriptionRequest {
            file_id: file_id.to_string(),
            model: self.model.clone(),
            language_hints: if self.language.is_empty() {
                None
            } else {
                Some(vec![self.language.clone()])
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error("create transcription", e))?;
        let response = Self::ensure_success(response).await?;

        let payload: CreateTranscriptionResponse = response
            .json()
            .await
            .map_err(|e| self.request_error("parse create response", e))?;

        tracing::debug!(transcription_id = %payload.id, "Soniox transcription created");
        Ok(payload.id)
    }

    async fn poll_until_terminal(&self, transcription_id: &str) -> Result<(), RecognitionError> {
        for attempt in 1..=self.max_poll_attempts {
            let response = self
                .client
                .get(format!(
                    "{}/v1/transcriptions/{}",
                    self.base_url, transcription_id
                ))
                .bearer_auth(&self.api_key)
                .send()
                .await
                .map_err(|e| self.request_error("poll", e))?;
            let response = Self::ensure_success(response).await?;

            let payload: TranscriptionStatusResponse = response
                .json()
                .await
                .map_err(|e| self.request_error("parse status", e))?;

            match payload.status.as_str() {
                "completed" => return Ok(()),
                "error" => {
                    return Err(RecognitionError::Provider(
                        payload
                            .error_message
                            .unwrap_or_else(|| "transcription failed".to_string()),
                    ));
                }
                status => {
                    tracing::trace!(attempt, status, "transcription not terminal yet");
                    if attempt < self.max_poll_attempts {
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
            }
        }

        Err(RecognitionError::Timeout(
            self.poll_interval * self.max_poll_attempts,
        ))
    }

    async fn fetch_transcript(&self, transcription_id: &str) -> Result<String, RecognitionError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/transcriptions/{}/transcript",
                self.base_url, transcription_id
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.request_error("fetch transcript", e))?;
        let response = Self::ensure_success(response).await?;

        let payload: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| self.request_error("parse transcript", e))?;

        Ok(payload.text)
    }

    async fn run_job(&self, file_id: &str) -> Result<String, RecognitionError> {
        let transcription_id = self.create_transcription(file_id).await?;
        self.poll_until_terminal(&transcription_id).await?;
        let text = self.fetch_transcript(&transcription_id).await?;
        Ok(text.trim().to_string())
    }

    /// Best-effort cleanup of the uploaded file. Failures are logged and
    /// never override the primary result.
    async fn delete_file(&self, file_id: &str) {
        let result = self
            .client
            .delete(format!("{}/v1/files/{}", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(file_id, "Soniox upload deleted");
            }
            Ok(response) => {
                tracing::warn!(file_id, status = %response.status(), "failed to delete Soniox upload");
            }
            Err(e) => {
                tracing::warn!(file_id, error = %e, "failed to delete Soniox upload");
            }
        }
    }
}

#[derive(Serialize)]
struct CreateTranscriptionRequest {
    file_id: String,
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_hints: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct FileUploadResponse {
    id: String,
}

#[derive(Deserialize)]
struct CreateTranscriptionResponse {
    id: String,
}

#[derive(Deserialize)]
struct TranscriptionStatusResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptResponse {
    text: String,
}

#[async_trait]
impl SpeechRecognizer for SonioxRecognizer {
    async fn recognize(&self, audio: &AudioArtifact) -> Result<String, RecognitionError> {
        if self.api_key.trim().is_empty() {
            return Err(RecognitionError::MissingConfig(
                "Soniox API key is missing".to_string(),
            ));
        }

        let wav = audio
            .read_bytes()
            .await
            .map_err(|e| RecognitionError::Transport(format!("read artifact: {}", e)))?;

        let file_id = self.upload_file(wav).await?;
        let result = self.run_job(&file_id).await;
        self.delete_file(&file_id).await;

        if let Ok(ref text) = result {
            tracing::info!(chars = text.len(), "Soniox transcription completed");
        }

        result
    }
}
