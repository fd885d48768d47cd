use std::path::{Path, PathBuf};
use std::sync::Arc;

use lydskrift::application::ports::{ExportError, SegmentExporter};
use lydskrift::application::services::{ComplianceConfig, SizeComplianceLoop};
use lydskrift::domain::{AudioHandle, ExportParams, SegmentPlan, SegmentRange, SourceFormat};

/// Exporter that reports true PCM sizes without touching the disk, so the
/// degradation and bisection decisions can be observed directly.
struct PcmSizeExporter;

#[async_trait::async_trait]
impl SegmentExporter for PcmSizeExporter {
    async fn export(
        &self,
        _handle: &AudioHandle,
        range: SegmentRange,
        params: ExportParams,
        _dest: &Path,
    ) -> Result<u64, ExportError> {
        let bytes_per_sec = params.sample_rate as u64 * 2 * params.channels as u64;
        Ok(range.duration_ms() * bytes_per_sec / 1000)
    }
}

fn canonical_handle(duration_ms: u64) -> AudioHandle {
    let byte_size = duration_ms * 44_100 * 2 / 1000;
    AudioHandle {
        path: PathBuf::from("/tmp/canonical.wav"),
        duration_ms,
        sample_rate: 44_100,
        channels: 1,
        byte_size,
        source_format: SourceFormat::Wav,
    }
}

fn compliance(budget: u64, min_child_ms: u64) -> SizeComplianceLoop {
    SizeComplianceLoop::new(
        Arc::new(PcmSizeExporter),
        ComplianceConfig {
            hard_budget_bytes: budget,
            min_child_ms,
        },
    )
}

#[tokio::test]
async fn given_compliant_export_when_enforcing_then_canonical_tier_is_kept() {
    // 5s mono at 44.1kHz is ~441KB, well under a 1MB budget.
    let handle = canonical_handle(60_000);
    let range = SegmentRange::new(0, 5_000);

    let artifacts = compliance(1_024 * 1_024, 1_000)
        .enforce(range, &handle, Path::new("/tmp"))
        .await
        .expect("enforce failed");

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].params.sample_rate, 44_100);
    assert!(!artifacts[0].oversize);
}

#[tokio::test]
async fn given_oversized_export_when_enforcing_then_sample_rate_is_degraded() {
    // 20s at 44.1kHz is ~1.76MB; at 16kHz it drops to 640KB.
    let handle = canonical_handle(60_000);
    let range = SegmentRange::new(0, 20_000);

    let artifacts = compliance(1_000_000, 1_000)
        .enforce(range, &handle, Path::new("/tmp"))
        .await
        .expect("enforce failed");

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].params.sample_rate, 16_000);
    assert!(artifacts[0].byte_size <= 1_000_000);
    assert!(!artifacts[0].oversize);
}

#[tokio::test]
async fn given_exhausted_tiers_when_enforcing_then_range_is_bisected_into_cover() {
    // 20s at 8kHz is still 320KB; a 100KB budget forces two rounds of
    // bisection down to 5s children that comply at the lowest tier.
    let handle = canonical_handle(60_000);
    let range = SegmentRange::new(0, 20_000);

    let artifacts = compliance(100_000, 1_000)
        .enforce(range, &handle, Path::new("/tmp"))
        .await
        .expect("enforce failed");

    assert_eq!(artifacts.len(), 4);
    let ranges: Vec<SegmentRange> = artifacts.iter().map(|a| a.range).collect();
    assert!(SegmentPlan::is_contiguous_cover(&ranges, 20_000));
    for artifact in &artifacts {
        assert!(artifact.byte_size <= 100_000);
        assert_eq!(artifact.params.sample_rate, 8_000);
        assert!(!artifact.oversize);
    }
}

#[tokio::test]
async fn given_bisection_floor_when_still_over_budget_then_artifact_is_flagged_oversize() {
    // 6s at 8kHz is 96KB, over a 50KB budget, and splitting would produce 3s
    // children under the 5s floor.
    let handle = canonical_handle(60_000);
    let range = SegmentRange::new(0, 6_000);

    let artifacts = compliance(50_000, 5_000)
        .enforce(range, &handle, Path::new("/tmp"))
        .await
        .expect("enforce failed");

    assert_eq!(artifacts.len(), 1);
    assert!(artifacts[0].oversize);
    assert_eq!(artifacts[0].params.sample_rate, 8_000);
    assert!(artifacts[0].byte_size > 50_000);
}

#[tokio::test]
async fn given_zero_floor_config_when_enforcing_tiny_range_then_no_empty_children_are_split_off() {
    // A misconfigured zero floor must not let a 1ms range bisect into an
    // empty child; the loop clamps the floor and flags the range oversize.
    let handle = canonical_handle(60_000);
    let range = SegmentRange::new(0, 1);

    let artifacts = compliance(10, 0)
        .enforce(range, &handle, Path::new("/tmp"))
        .await
        .expect("enforce failed");

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].range, range);
    assert!(artifacts[0].oversize);
}
