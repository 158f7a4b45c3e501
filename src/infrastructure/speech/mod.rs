mod azure_speech_recognizer;
mod mock_recognizer;
mod recognizer_factory;
mod soniox_recognizer;

pub use azure_speech_recognizer::AzureSpeechRecognizer;
pub use mock_recognizer::{FailingRecognizer, MockRecognizer, TimeoutRecognizer};
pub use recognizer_factory::{RecognizerConfig, RecognizerFactory, SpeechProvider};
pub use soniox_recognizer::{SonioxRecognizer, DEFAULT_SONIOX_BASE_URL};
