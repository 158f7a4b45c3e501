/// Fixed decode target for every pipeline run: 16 kHz mono 16-bit PCM WAV.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
pub const TARGET_CHANNELS: u32 = 1;
pub const WAV_MIME: &str = "audio/wav";
