use std::fmt;

/// Half-open time range `[start_ms, end_ms)` over the canonical audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl SegmentRange {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        debug_assert!(start_ms < end_ms, "segment range must be non-empty");
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Split at the midpoint into two non-empty child ranges.
    pub fn bisect(&self) -> (SegmentRange, SegmentRange) {
        let mid = self.start_ms + self.duration_ms() / 2;
        (
            SegmentRange::new(self.start_ms, mid),
            SegmentRange::new(mid, self.end_ms),
        )
    }
}

impl fmt::Display for SegmentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}ms, {}ms)", self.start_ms, self.end_ms)
    }
}

/// Ordered, contiguous, non-overlapping cover of `[0, total_duration_ms)`.
#[derive(Debug, Clone)]
pub struct SegmentPlan {
    ranges: Vec<SegmentRange>,
    total_duration_ms: u64,
}

impl SegmentPlan {
    /// Build a plan, asserting the cover invariant.
    ///
    /// Panics in debug builds if the ranges are not a gapless ascending cover
    /// of the full duration; the planner is the only producer and guarantees
    /// this by construction.
    pub fn new(ranges: Vec<SegmentRange>, total_duration_ms: u64) -> Self {
        debug_assert!(Self::is_contiguous_cover(&ranges, total_duration_ms));
        Self {
            ranges,
            total_duration_ms,
        }
    }

    pub fn ranges(&self) -> &[SegmentRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn is_contiguous_cover(ranges: &[SegmentRange], total_duration_ms: u64) -> bool {
        if ranges.is_empty() {
            return total_duration_ms == 0;
        }
        if ranges[0].start_ms != 0 {
            return false;
        }
        for pair in ranges.windows(2) {
            if pair[0].end_ms != pair[1].start_ms {
                return false;
            }
        }
        ranges.iter().all(|r| r.start_ms < r.end_ms)
            && ranges.last().map(|r| r.end_ms) == Some(total_duration_ms)
    }
}
