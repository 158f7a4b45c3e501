use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::{AudioArtifact, TARGET_SAMPLE_RATE};

/// Single-shot push recognizer against the Azure speech short-audio REST
/// endpoint: the whole WAV body is sent up front and exactly one terminal
/// result is awaited, bounded by a wall-clock timeout. Dropping the
/// in-flight request on timeout closes the provider session.
pub struct AzureSpeechRecognizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    timeout: Duration,
}

impl AzureSpeechRecognizer {
    pub fn new(base_url: &str, api_key: &str, language: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
            timeout,
        }
    }

    pub fn for_region(region: &str, api_key: &str, language: &str, timeout: Duration) -> Self {
        Self::new(
            &format!("https://{}.stt.speech.microsoft.com", region),
            api_key,
            language,
            timeout,
        )
    }
}

#[derive(Deserialize)]
struct ShortAudioResponse {
    #[serde(rename = "RecognitionStatus")]
    recognition_status: String,
    #[serde(rename = "DisplayText", default)]
    display_text: String,
}

#[async_trait]
impl SpeechRecognizer for AzureSpeechRecognizer {
    async fn recognize(&self, audio: &AudioArtifact) -> Result<String, RecognitionError> {
        if self.api_key.trim().is_empty() {
            return Err(RecognitionError::MissingConfig(
                "Azure speech key is missing".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(RecognitionError::MissingConfig(
                "Azure speech region or endpoint is missing".to_string(),
            ));
        }

        let wav = audio
            .read_bytes()
            .await
            .map_err(|e| RecognitionError::Transport(format!("read artifact: {}", e)))?;

        let url = format!(
            "{}/speech/recognition/conversation/cognitiveservices/v1",
            self.base_url
        );

        tracing::debug!(endpoint = %url, bytes = wav.len(), "sending audio to Azure speech");

        let request = self
            .client
            .post(&url)
            .query(&[("language", self.language.as_str()), ("format", "simple")])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!(
                    "audio/wav; codecs=audio/pcm; samplerate={}",
                    TARGET_SAMPLE_RATE
                ),
            )
            .body(wav);

        // One timeout over the whole exchange: a provider that returns
        // headers and then stalls the body must not hold the request open.
        let result: ShortAudioResponse = tokio::time::timeout(self.timeout, async {
            let response = request
                .send()
                .await
                .map_err(|e| RecognitionError::Transport(format!("request: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(RecognitionError::Provider(format!(
                    "status {}: {}",
                    status, body
                )));
            }

            response
                .json::<ShortAudioResponse>()
                .await
                .map_err(|e| RecognitionError::Provider(format!("parse response: {}", e)))
        })
        .await
        .map_err(|_| RecognitionError::Timeout(self.timeout))??;

        match result.recognition_status.as_str() {
            "Success" => {
                tracing::info!(
                    chars = result.display_text.len(),
                    "Azure speech recognition completed"
                );
                Ok(result.display_text)
            }
            // No-match outcomes are a valid empty result, not an error.
            "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => Ok(String::new()),
            other => Err(RecognitionError::Provider(format!(
                "recognition status {}",
                other
            ))),
        }
    }
}
