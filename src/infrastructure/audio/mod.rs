mod ffmpeg_transcoder;
mod mock_transcoder;

pub use ffmpeg_transcoder::FfmpegTranscoder;
pub use mock_transcoder::{FailingTranscoder, MockTranscoder};
