use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{AudioConverter, ConversionError};
use crate::domain::{AudioHandle, SourceFormat};
use crate::infrastructure::audio::wav;

const CANONICAL_FILENAME: &str = "canonical.wav";

/// Converts an uploaded file into the canonical working encoding.
///
/// Tries the external tool first and falls back to the in-process decoder
/// when the tool fails or is absent. An upload that already parses as
/// canonical WAV is validated and used in place.
pub struct FormatNormalizer {
    primary: Arc<dyn AudioConverter>,
    fallback: Arc<dyn AudioConverter>,
}

impl FormatNormalizer {
    pub fn new(primary: Arc<dyn AudioConverter>, fallback: Arc<dyn AudioConverter>) -> Self {
        Self { primary, fallback }
    }

    pub async fn normalize(
        &self,
        input: &Path,
        target_dir: &Path,
    ) -> Result<AudioHandle, ConversionError> {
        let source_format = input
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceFormat::from_extension)
            .ok_or_else(|| {
                ConversionError::UnsupportedFormat(format!(
                    "unrecognized extension on {}",
                    input.display()
                ))
            })?;

        // Pass-through: a well-formed canonical WAV needs no conversion.
        if source_format == SourceFormat::Wav {
            if let Ok(info) = wav::read_info(input) {
                if info.is_canonical() {
                    tracing::debug!(path = %input.display(), "Upload already canonical, skipping conversion");
                    return build_handle(input, source_format);
                }
            }
        }

        let output = target_dir.join(CANONICAL_FILENAME);

        match self.primary.convert(input, &output).await {
            Ok(()) => return validated(&output, source_format, self.primary.name()),
            Err(primary_err) => {
                tracing::warn!(
                    converter = self.primary.name(),
                    error = %primary_err,
                    "Primary converter failed, trying fallback"
                );

                match self.fallback.convert(input, &output).await {
                    Ok(()) => validated(&output, source_format, self.fallback.name()),
                    Err(fallback_err) => Err(ConversionError::AllConvertersFailed(format!(
                        "{}: {}; {}: {}",
                        self.primary.name(),
                        primary_err,
                        self.fallback.name(),
                        fallback_err
                    ))),
                }
            }
        }
    }
}

fn validated(
    output: &Path,
    source_format: SourceFormat,
    converter: &str,
) -> Result<AudioHandle, ConversionError> {
    let handle = build_handle(output, source_format)?;
    tracing::info!(
        converter,
        duration_ms = handle.duration_ms,
        bytes = handle.byte_size,
        "Audio normalized to canonical encoding"
    );
    Ok(handle)
}

fn build_handle(path: &Path, source_format: SourceFormat) -> Result<AudioHandle, ConversionError> {
    let info = wav::read_info(path)
        .map_err(|e| ConversionError::DecodingFailed(format!("canonical output invalid: {}", e)))?;
    let byte_size = std::fs::metadata(path)?.len();

    Ok(AudioHandle {
        path: path.to_path_buf(),
        duration_ms: info.duration_ms(),
        sample_rate: info.sample_rate,
        channels: info.channels,
        byte_size,
        source_format,
    })
}
