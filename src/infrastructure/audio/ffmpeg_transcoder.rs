use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::application::ports::{TranscodeError, Transcoder};
use crate::domain::{AudioArtifact, TARGET_CHANNELS, TARGET_SAMPLE_RATE, WAV_MIME};

/// Transcoder backed by an external ffmpeg executable.
///
/// The subprocess is spawned with `kill_on_drop`, so losing the timeout race
/// kills the engine rather than letting it outlive the request. Partial
/// output files are removed on every failure path.
pub struct FfmpegTranscoder {
    program: PathBuf,
    timeout: Duration,
    output_dir: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            output_dir: std::env::temp_dir(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Stage the input on disk for the engine. Memory-backed uploads go
    /// through a named temp file that deletes itself when the guard drops.
    async fn stage_input(
        input: &AudioArtifact,
    ) -> Result<(Option<tempfile::NamedTempFile>, PathBuf), TranscodeError> {
        if let Some(path) = input.path() {
            return Ok((None, path.to_path_buf()));
        }

        let bytes = input.read_bytes().await?;
        let file = tempfile::Builder::new().prefix("voxrelay-in-").tempfile()?;
        tokio::fs::write(file.path(), &bytes).await?;
        let path = file.path().to_path_buf();
        Ok((Some(file), path))
    }

    async fn remove_partial_output(path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %path.display(), "failed to remove partial transcode output");
            }
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &AudioArtifact) -> Result<AudioArtifact, TranscodeError> {
        let (_input_guard, input_path) = Self::stage_input(input).await?;
        let output_path = self
            .output_dir
            .join(format!("voxrelay-{}.wav", Uuid::new_v4()));

        let mut command = Command::new(&self.program);
        command
            .arg("-y")
            .arg("-i")
            .arg(&input_path)
            .arg("-ac")
            .arg(TARGET_CHANNELS.to_string())
            .arg("-ar")
            .arg(TARGET_SAMPLE_RATE.to_string())
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-f")
            .arg("wav")
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            program = %self.program.display(),
            input = %input_path.display(),
            "starting transcode"
        );

        let child = command.spawn()?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                // The dropped wait future takes the child with it;
                // kill_on_drop terminates the engine before cleanup.
                Self::remove_partial_output(&output_path).await;
                tracing::warn!(timeout = ?self.timeout, "transcode killed after exceeding its timeout");
                return Err(TranscodeError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            Self::remove_partial_output(&output_path).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .trim()
                .lines()
                .last()
                .unwrap_or("engine exited with failure")
                .to_string();
            tracing::error!(status = %output.status, detail = %detail, "transcode engine failed");
            return Err(TranscodeError::EngineFailed(detail));
        }

        let metadata = tokio::fs::metadata(&output_path).await.map_err(|_| {
            TranscodeError::EngineFailed("engine produced no output artifact".to_string())
        })?;

        tracing::debug!(bytes = metadata.len(), "transcode produced wav artifact");

        Ok(AudioArtifact::from_temp_file(
            output_path,
            WAV_MIME,
            metadata.len(),
        ))
    }
}
