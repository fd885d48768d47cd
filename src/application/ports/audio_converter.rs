use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Converts an arbitrary audio container into the canonical working encoding
/// (44.1 kHz mono PCM16 WAV), writing the result to `output`.
///
/// Implementations never mutate the input file.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;

    /// Short name used in logs and combined error diagnostics.
    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("conversion tool failed: {0}")]
    ToolFailed(String),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("no converter produced usable audio: {0}")]
    AllConvertersFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
