mod settings;

pub use settings::{LoggingSettings, ServerSettings, Settings, SpeechSettings, TranscodeSettings};
