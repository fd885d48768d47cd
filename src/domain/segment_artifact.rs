use std::path::PathBuf;

use super::SegmentRange;

/// Encoding parameters a segment was actually exported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportParams {
    pub sample_rate: u32,
    pub channels: u16,
}

impl ExportParams {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

/// One exported, size-checked audio segment on disk.
///
/// `oversize` marks an artifact that still exceeds the hard budget after the
/// compliance loop hit its bisection floor. Such artifacts are still handed
/// to the dispatcher; the remote service gets the final say.
#[derive(Debug, Clone)]
pub struct SegmentArtifact {
    pub path: PathBuf,
    pub range: SegmentRange,
    pub byte_size: u64,
    pub params: ExportParams,
    pub oversize: bool,
}

impl SegmentArtifact {
    pub fn complies_with(&self, hard_budget_bytes: u64) -> bool {
        self.byte_size <= hard_budget_bytes
    }
}
