use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::{AudioHandle, ExportParams, SegmentRange};

/// Exports one time range of the canonical audio to `dest` under the given
/// encoding parameters, returning the byte size of the written file.
#[async_trait]
pub trait SegmentExporter: Send + Sync {
    async fn export(
        &self,
        handle: &AudioHandle,
        range: SegmentRange,
        params: ExportParams,
        dest: &Path,
    ) -> Result<u64, ExportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("segment export failed: {0}")]
    ExportFailed(String),
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
