/// Failure taxonomy for one pipeline run. The wire form is the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NoFile,
    ConfigError,
    TranscodeFailed,
    TranscodeTimeout,
    ProviderError,
    RecognitionTimeout,
    InternalError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoFile => "NoFile",
            FailureKind::ConfigError => "ConfigError",
            FailureKind::TranscodeFailed => "TranscodeFailed",
            FailureKind::TranscodeTimeout => "TranscodeTimeout",
            FailureKind::ProviderError => "ProviderError",
            FailureKind::RecognitionTimeout => "RecognitionTimeout",
            FailureKind::InternalError => "InternalError",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FailureKind::TranscodeTimeout | FailureKind::RecognitionTimeout
        )
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal outcome of one pipeline run. Constructed exactly once per
/// request; `NoSpeech` is a valid empty result, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    Recognized(String),
    NoSpeech,
    Failed {
        kind: FailureKind,
        message: Option<String>,
    },
}

impl PipelineResult {
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
