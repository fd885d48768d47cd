use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::application::ports::{ExportError, SegmentExporter};
use crate::domain::{AudioHandle, ExportParams, SegmentArtifact, SegmentRange};

/// Quality tiers tried in order before bisection: downmix first, then the
/// two lower sample rates.
const DEGRADED_SAMPLE_RATES: [u32; 2] = [16_000, 8_000];

#[derive(Debug, Clone)]
pub struct ComplianceConfig {
    pub hard_budget_bytes: u64,
    /// Bisection floor: ranges at or below twice this duration are not split
    /// further, so no child ever goes under it.
    pub min_child_ms: u64,
}

/// Verifies every exported segment against the hard byte budget, degrading
/// quality and finally bisecting the time range until each piece complies.
///
/// The planner's estimate is provisional by design; this loop is the
/// mandatory measurement stage.
pub struct SizeComplianceLoop {
    exporter: Arc<dyn SegmentExporter>,
    config: ComplianceConfig,
}

impl SizeComplianceLoop {
    pub fn new(exporter: Arc<dyn SegmentExporter>, config: ComplianceConfig) -> Self {
        // A zero floor would let bisection recurse into empty child ranges.
        let config = ComplianceConfig {
            min_child_ms: config.min_child_ms.max(1),
            ..config
        };
        Self { exporter, config }
    }

    /// Produce one or more compliant artifacts covering `range`, in time
    /// order. More than one artifact is returned only when bisection was
    /// required. An artifact still over budget at the bisection floor is
    /// returned with `oversize = true` rather than looping forever.
    pub async fn enforce(
        &self,
        range: SegmentRange,
        handle: &AudioHandle,
        work_dir: &Path,
    ) -> Result<Vec<SegmentArtifact>, ExportError> {
        self.enforce_inner(range, handle, work_dir).await
    }

    fn enforce_inner<'a>(
        &'a self,
        range: SegmentRange,
        handle: &'a AudioHandle,
        work_dir: &'a Path,
    ) -> BoxFuture<'a, Result<Vec<SegmentArtifact>, ExportError>> {
        async move {
            let dest = segment_path(work_dir, range);
            let mut artifact = self.export_tier(range, handle, &dest, None).await?;

            if artifact.complies_with(self.config.hard_budget_bytes) {
                return Ok(vec![artifact]);
            }

            for sample_rate in degradation_tiers(handle) {
                tracing::debug!(
                    range = %range,
                    bytes = artifact.byte_size,
                    budget = self.config.hard_budget_bytes,
                    next_sample_rate = sample_rate,
                    "Segment over budget, degrading quality"
                );
                artifact = self
                    .export_tier(range, handle, &dest, Some(sample_rate))
                    .await?;
                if artifact.complies_with(self.config.hard_budget_bytes) {
                    return Ok(vec![artifact]);
                }
            }

            // Quality degradation exhausted; split the range in time unless
            // the children would fall under the recursion floor.
            if range.duration_ms() / 2 < self.config.min_child_ms {
                tracing::warn!(
                    range = %range,
                    bytes = artifact.byte_size,
                    budget = self.config.hard_budget_bytes,
                    "Size overflow at bisection floor, delivering oversized segment"
                );
                artifact.oversize = true;
                return Ok(vec![artifact]);
            }

            remove_superseded(&artifact.path).await;
            let (left, right) = range.bisect();
            let mut artifacts = self.enforce_inner(left, handle, work_dir).await?;
            artifacts.extend(self.enforce_inner(right, handle, work_dir).await?);
            Ok(artifacts)
        }
        .boxed()
    }

    /// Export `range` at the given tier, deleting any artifact the export
    /// supersedes so oversized files never accumulate.
    async fn export_tier(
        &self,
        range: SegmentRange,
        handle: &AudioHandle,
        dest: &Path,
        sample_rate: Option<u32>,
    ) -> Result<SegmentArtifact, ExportError> {
        let params = match sample_rate {
            None => ExportParams::new(handle.sample_rate, handle.channels),
            Some(rate) => ExportParams::new(rate, 1),
        };

        remove_superseded(dest).await;
        let byte_size = self.exporter.export(handle, range, params, dest).await?;

        Ok(SegmentArtifact {
            path: dest.to_path_buf(),
            range,
            byte_size,
            params,
            oversize: false,
        })
    }
}

/// Degraded tiers for this audio, skipping any that would not change the
/// encoding (e.g. canonical audio already at or below the tier's rate).
fn degradation_tiers(handle: &AudioHandle) -> Vec<u32> {
    DEGRADED_SAMPLE_RATES
        .iter()
        .copied()
        .filter(|&rate| rate < handle.sample_rate || handle.channels > 1)
        .collect()
}

fn segment_path(work_dir: &Path, range: SegmentRange) -> PathBuf {
    work_dir.join(format!("seg_{}_{}.wav", range.start_ms, range.end_ms))
}

async fn remove_superseded(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete superseded artifact");
        }
    }
}
