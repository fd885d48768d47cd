use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{ConversionError, ExportError, ProgressSink};
use crate::application::services::compliance::SizeComplianceLoop;
use crate::application::services::dispatcher::{
    DispatchError, DispatchMode, TranscriptionDispatcher,
};
use crate::application::services::planner::{self, PlannerConfig, PlanningError};
use crate::application::services::FormatNormalizer;
use crate::domain::{
    assemble_transcript, suggested_transcript_filename, SegmentArtifact, SegmentOutcome,
};

pub struct TranscriptOutput {
    pub transcript: String,
    pub suggested_filename: String,
    pub segments_total: usize,
    pub segments_failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("normalization: {0}")]
    Normalization(#[from] ConversionError),
    #[error("planning: {0}")]
    Planning(#[from] PlanningError),
    #[error("segment export: {0}")]
    Export(#[from] ExportError),
    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),
}

/// End-to-end transcription pipeline: normalize the upload, plan segments,
/// enforce the size budget on each, dispatch, and assemble the transcript.
pub struct TranscriptionPipeline {
    normalizer: FormatNormalizer,
    planner_config: PlannerConfig,
    compliance: SizeComplianceLoop,
    dispatcher: TranscriptionDispatcher,
}

impl TranscriptionPipeline {
    pub fn new(
        normalizer: FormatNormalizer,
        planner_config: PlannerConfig,
        compliance: SizeComplianceLoop,
        dispatcher: TranscriptionDispatcher,
    ) -> Self {
        Self {
            normalizer,
            planner_config,
            compliance,
            dispatcher,
        }
    }

    /// Run the whole pipeline for one upload.
    ///
    /// `work_dir` holds the canonical WAV and every segment artifact; the
    /// caller owns it and deletes it when the job ends either way. Artifacts
    /// themselves are deleted as soon as their result is recorded.
    pub async fn run(
        &self,
        input: &Path,
        original_filename: &str,
        language: &str,
        mode: DispatchMode,
        work_dir: &Path,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<TranscriptOutput, PipelineError> {
        progress.report(0.05, "Normalizing audio").await;
        let handle = self.normalizer.normalize(input, work_dir).await?;

        progress.report(0.10, "Planning segments").await;
        let plan = planner::plan(&handle, &self.planner_config)?;
        let planned = plan.len();

        // Size compliance may bisect a planned range into several artifacts;
        // dense chronological indices are assigned after flattening.
        let mut artifacts: Vec<SegmentArtifact> = Vec::with_capacity(planned);
        for (i, range) in plan.ranges().iter().enumerate() {
            let compliant = self.compliance.enforce(*range, &handle, work_dir).await?;
            artifacts.extend(compliant);
            let fraction = 0.10 + 0.15 * (i + 1) as f32 / planned as f32;
            progress
                .report(
                    fraction,
                    &format!("Prepared segment {} of {}", i + 1, planned),
                )
                .await;
        }

        let total = artifacts.len();
        if total != planned {
            tracing::info!(
                planned,
                exported = total,
                "Size compliance split planned segments"
            );
        }

        let results = self
            .dispatcher
            .dispatch(artifacts, language, mode, progress.as_ref())
            .await?;

        let failed = results
            .iter()
            .filter(|r| matches!(r.outcome, SegmentOutcome::Failed(_)))
            .count();
        let transcript = assemble_transcript(&results);

        progress.report(1.0, "Transcript assembled").await;
        tracing::info!(
            segments = total,
            failed,
            transcript_chars = transcript.len(),
            "Transcription pipeline finished"
        );

        Ok(TranscriptOutput {
            transcript,
            suggested_filename: suggested_transcript_filename(original_filename),
            segments_total: total,
            segments_failed: failed,
        })
    }
}
