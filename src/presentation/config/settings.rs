use std::time::Duration;

use crate::infrastructure::speech::{SpeechProvider, DEFAULT_SONIOX_BASE_URL};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;
const DEFAULT_LANGUAGE: &str = "he-IL";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcode: TranscodeSettings,
    pub speech: SpeechSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct TranscodeSettings {
    pub ffmpeg_path: String,
    pub timeout_secs: u64,
}

impl TranscodeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub provider: SpeechProvider,
    /// Soft setting: defaults when absent instead of failing the request.
    pub language: String,
    pub timeout_secs: u64,
    pub azure_key: Option<String>,
    pub azure_region: Option<String>,
    pub azure_endpoint: Option<String>,
    pub soniox_api_key: Option<String>,
    pub soniox_base_url: String,
    pub soniox_model: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

impl SpeechSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Explicit endpoint override wins over the region-derived base URL.
    /// `None` surfaces per request as a configuration failure.
    pub fn azure_base_url(&self) -> Option<String> {
        self.azure_endpoint.clone().or_else(|| {
            self.azure_region
                .as_ref()
                .map(|region| format!("https://{}.stt.speech.microsoft.com", region))
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        let provider = std::env::var("SPEECH_PROVIDER")
            .ok()
            .map(|raw| {
                SpeechProvider::parse(&raw).unwrap_or_else(|| {
                    tracing::warn!(provider = %raw, "unknown speech provider, defaulting to azure");
                    SpeechProvider::Azure
                })
            })
            .unwrap_or(SpeechProvider::Azure);

        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse("SERVER_PORT", 3000),
                max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
            transcode: TranscodeSettings {
                ffmpeg_path: env_or("FFMPEG_PATH", "ffmpeg"),
                timeout_secs: env_parse("TRANSCODE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            },
            speech: SpeechSettings {
                provider,
                language: env_or("SPEECH_LANG", DEFAULT_LANGUAGE),
                timeout_secs: env_parse("RECOGNITION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
                azure_key: std::env::var("AZURE_SPEECH_KEY").ok(),
                azure_region: std::env::var("AZURE_SPEECH_REGION").ok(),
                azure_endpoint: std::env::var("AZURE_SPEECH_ENDPOINT").ok(),
                soniox_api_key: std::env::var("SONIOX_API_KEY").ok(),
                soniox_base_url: env_or("SONIOX_BASE_URL", DEFAULT_SONIOX_BASE_URL),
                soniox_model: env_or("SONIOX_MODEL", "stt-async-v4"),
                poll_interval_ms: env_parse("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
                max_poll_attempts: env_parse("MAX_POLL_ATTEMPTS", DEFAULT_MAX_POLL_ATTEMPTS),
            },
            logging: LoggingSettings {
                level: env_or("RUST_LOG", "info"),
                enable_json: std::env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
