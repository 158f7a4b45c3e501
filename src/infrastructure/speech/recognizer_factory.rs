use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::SpeechRecognizer;

use super::azure_speech_recognizer::AzureSpeechRecognizer;
use super::soniox_recognizer::SonioxRecognizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProvider {
    Azure,
    Soniox,
}

impl SpeechProvider {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "azure" => Some(Self::Azure),
            "soniox" => Some(Self::Soniox),
            _ => None,
        }
    }
}

/// Provider wiring resolved from settings. Credentials may be absent here;
/// the recognizers fail each request with a configuration error before any
/// network call, so a misconfigured relay still starts and serves /health.
pub struct RecognizerConfig {
    pub language: String,
    pub timeout: Duration,
    pub azure_key: Option<String>,
    pub azure_base_url: Option<String>,
    pub soniox_api_key: Option<String>,
    pub soniox_base_url: String,
    pub soniox_model: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

pub struct RecognizerFactory;

impl RecognizerFactory {
    pub fn create(provider: SpeechProvider, config: RecognizerConfig) -> Arc<dyn SpeechRecognizer> {
        match provider {
            SpeechProvider::Azure => Arc::new(AzureSpeechRecognizer::new(
                config.azure_base_url.as_deref().unwrap_or(""),
                config.azure_key.as_deref().unwrap_or(""),
                &config.language,
                config.timeout,
            )),
            SpeechProvider::Soniox => Arc::new(SonioxRecognizer::new(
                &config.soniox_base_url,
                config.soniox_api_key.as_deref().unwrap_or(""),
                &config.soniox_model,
                &config.language,
                config.timeout,
                config.poll_interval,
                config.max_poll_attempts,
            )),
        }
    }
}
