mod audio_handle;
mod job;
mod job_id;
mod job_status;
mod segment_artifact;
mod segment_plan;
mod transcript;

pub use audio_handle::{AudioHandle, SourceFormat, CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE};
pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use segment_artifact::{ExportParams, SegmentArtifact};
pub use segment_plan::{SegmentPlan, SegmentRange};
pub use transcript::{
    assemble_transcript, suggested_transcript_filename, SegmentFailure, SegmentOutcome,
    TranscriptionResult,
};
