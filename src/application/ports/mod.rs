mod speech_recognizer;
mod transcoder;

pub use speech_recognizer::{RecognitionError, SpeechRecognizer};
pub use transcoder::{TranscodeError, Transcoder};
