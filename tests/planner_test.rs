use std::path::PathBuf;

use lydskrift::application::services::{plan, PlannerConfig};
use lydskrift::domain::{AudioHandle, SegmentPlan, SourceFormat};

fn handle(duration_ms: u64, byte_size: u64) -> AudioHandle {
    AudioHandle {
        path: PathBuf::from("/tmp/canonical.wav"),
        duration_ms,
        sample_rate: 44_100,
        channels: 1,
        byte_size,
        source_format: SourceFormat::Wav,
    }
}

fn config() -> PlannerConfig {
    PlannerConfig {
        target_segment_bytes: 25 * 1024 * 1024,
        safety_factor: 0.8,
        min_segment_ms: 30_000,
        max_segment_ms: 300_000,
    }
}

#[test]
fn given_varied_durations_when_planning_then_ranges_always_cover_the_audio() {
    // Canonical mono 16-bit PCM at 44.1kHz is 88,200 bytes per second.
    for duration_ms in [1u64, 500, 30_000, 61_777, 600_000, 3_600_000, 7_261_003] {
        let byte_size = duration_ms * 88_200 / 1000;
        let plan = plan(&handle(duration_ms, byte_size.max(1)), &config()).unwrap();

        assert!(
            SegmentPlan::is_contiguous_cover(plan.ranges(), duration_ms),
            "plan for {}ms is not a contiguous cover",
            duration_ms
        );
    }
}

#[test]
fn given_same_audio_when_planning_twice_then_plans_are_identical() {
    let audio = handle(3_600_000, 300 * 1024 * 1024);
    let first = plan(&audio, &config()).unwrap();
    let second = plan(&audio, &config()).unwrap();
    assert_eq!(first.ranges(), second.ranges());
}

#[test]
fn given_short_audio_when_planning_then_single_segment_spans_it_all() {
    let plan = plan(&handle(10_000, 1_764_000), &config()).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.ranges()[0].start_ms, 0);
    assert_eq!(plan.ranges()[0].end_ms, 10_000);
}

#[test]
fn given_all_segments_when_planning_then_none_exceeds_the_configured_maximum() {
    let plan = plan(&handle(3_600_000, 400 * 1024 * 1024), &config()).unwrap();
    for range in plan.ranges() {
        assert!(range.duration_ms() <= config().max_segment_ms);
    }
}
