use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioConverter, ConversionError};
use crate::domain::{CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE};

const STDERR_PREVIEW_CHARS: usize = 400;

/// Normalizes audio by shelling out to `ffmpeg`.
///
/// Stderr is captured for diagnostics only and never parsed structurally.
pub struct FfmpegConverter {
    binary: String,
}

impl FfmpegConverter {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that the ffmpeg binary is present and runnable.
pub fn check_ffmpeg_binary() -> Result<(), ConversionError> {
    let output = std::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| ConversionError::ToolFailed(format!("ffmpeg not runnable: {}", e)))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ConversionError::ToolFailed(
            "ffmpeg -version exited with failure".to_string(),
        ))
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ar")
            .arg(CANONICAL_SAMPLE_RATE.to_string())
            .arg("-ac")
            .arg(CANONICAL_CHANNELS.to_string())
            .arg("-f")
            .arg("wav")
            .arg("-nostdin")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg(output);

        tracing::debug!(input = %input.display(), output = %output.display(), "Invoking ffmpeg");

        let result = cmd
            .output()
            .await
            .map_err(|e| ConversionError::ToolFailed(format!("failed to spawn ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let preview: String = stderr.chars().take(STDERR_PREVIEW_CHARS).collect();
            return Err(ConversionError::ToolFailed(format!(
                "ffmpeg exited with {}: {}",
                result.status, preview
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}
