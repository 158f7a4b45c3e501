mod artifact;
mod conversation_id;
mod pipeline_result;
mod target_format;

pub use artifact::AudioArtifact;
pub use conversation_id::ConversationId;
pub use pipeline_result::{FailureKind, PipelineResult};
pub use target_format::{TARGET_CHANNELS, TARGET_SAMPLE_RATE, WAV_MIME};
