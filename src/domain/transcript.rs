/// Why a segment produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentFailure {
    /// Network error or a retryable service error (timeouts, 5xx).
    Transient(String),
    /// The remote service rejected the payload as too large, meaning the
    /// size-compliance loop under-estimated the export size.
    PayloadTooLarge(String),
}

impl SegmentFailure {
    /// Bracketed placeholder embedded at the segment's position so gaps in
    /// the transcript stay visible instead of being silently dropped.
    pub fn marker(&self) -> &'static str {
        match self {
            SegmentFailure::Transient(_) => "[transcription failed]",
            SegmentFailure::PayloadTooLarge(_) => "[segment too large for transcription service]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Text(String),
    Failed(SegmentFailure),
}

/// Result of transcribing one segment, tagged with its chronological index.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub index: usize,
    pub outcome: SegmentOutcome,
}

/// Join per-segment results in ascending index order into the final
/// transcript, trimming incidental whitespace at segment boundaries.
///
/// The caller passes results already dense and sorted by index; the
/// dispatcher guarantees both.
pub fn assemble_transcript(results: &[TranscriptionResult]) -> String {
    let mut pieces: Vec<&str> = Vec::with_capacity(results.len());
    for result in results {
        match &result.outcome {
            SegmentOutcome::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pieces.push(trimmed);
                }
            }
            SegmentOutcome::Failed(failure) => pieces.push(failure.marker()),
        }
    }
    pieces.join(" ")
}

/// Suggested download name for the assembled transcript.
pub fn suggested_transcript_filename(original_filename: &str) -> String {
    let stem = original_filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(original_filename);
    format!("{}_transcript.txt", stem)
}
