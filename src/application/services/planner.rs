use crate::domain::{AudioHandle, SegmentPlan, SegmentRange};

/// Tuning for the segmentation planner.
///
/// `safety_factor` shrinks the byte-rate-derived candidate duration because
/// the estimate cannot see the actual export encoding; the compliance loop
/// downstream measures the real size of every export.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub target_segment_bytes: u64,
    pub safety_factor: f64,
    pub min_segment_ms: u64,
    pub max_segment_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("cannot plan segments for zero-duration audio")]
    EmptyAudio,
}

/// Compute an ordered, contiguous cover of the audio's duration whose
/// segments are expected to export under the byte target.
pub fn plan(handle: &AudioHandle, config: &PlannerConfig) -> Result<SegmentPlan, PlanningError> {
    let total_ms = handle.duration_ms;
    if total_ms == 0 {
        return Err(PlanningError::EmptyAudio);
    }

    let byte_rate = handle.byte_rate();
    let candidate_ms =
        (config.target_segment_bytes as f64 * config.safety_factor) / byte_rate;
    let candidate_ms = (candidate_ms as u64)
        .clamp(config.min_segment_ms, config.max_segment_ms)
        .max(1);

    let count = total_ms.div_ceil(candidate_ms);
    let mut ranges = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start_ms = i * candidate_ms;
        let end_ms = ((i + 1) * candidate_ms).min(total_ms);
        ranges.push(SegmentRange::new(start_ms, end_ms));
    }

    tracing::debug!(
        segments = ranges.len(),
        segment_ms = candidate_ms,
        total_ms,
        byte_rate,
        "Segmentation plan computed"
    );

    Ok(SegmentPlan::new(ranges, total_ms))
}
