use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{JobRepository, ProgressSink};
use crate::application::services::dispatcher::DispatchMode;
use crate::application::services::pipeline::{PipelineError, TranscriptionPipeline};
use crate::domain::{JobId, JobStatus};

/// One queued transcription job.
///
/// The workspace travels with the message so the staged upload and every
/// intermediate artifact are deleted when the message is dropped, on every
/// exit path.
pub struct TranscriptionJobMessage {
    pub job_id: JobId,
    pub filename: String,
    pub language: String,
    pub mode: DispatchMode,
    pub staged_path: PathBuf,
    pub workspace: TempDir,
}

pub struct TranscriptionWorker {
    receiver: mpsc::Receiver<TranscriptionJobMessage>,
    pipeline: Arc<TranscriptionPipeline>,
    job_repository: Arc<dyn JobRepository>,
}

impl TranscriptionWorker {
    pub fn new(
        receiver: mpsc::Receiver<TranscriptionJobMessage>,
        pipeline: Arc<TranscriptionPipeline>,
        job_repository: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            receiver,
            pipeline,
            job_repository,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Transcription worker started");
        while let Some(msg) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "transcription_job",
                job_id = %msg.job_id.as_uuid(),
                filename = %msg.filename,
            );
            async {
                if let Err(e) = self.process_job(msg).await {
                    tracing::error!(error = %e, "Transcription job failed");
                }
            }
            .instrument(span)
            .await;
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }

    async fn process_job(&self, msg: TranscriptionJobMessage) -> Result<(), WorkerError> {
        let job_id = msg.job_id;

        self.update_status(job_id, JobStatus::Processing, None)
            .await?;

        let progress: Arc<dyn ProgressSink> = Arc::new(RepositoryProgressSink {
            job_id,
            repository: Arc::clone(&self.job_repository),
        });

        let result = self
            .pipeline
            .run(
                &msg.staged_path,
                &msg.filename,
                &msg.language,
                msg.mode,
                msg.workspace.path(),
                progress,
            )
            .await;

        match result {
            Ok(output) => {
                self.job_repository
                    .store_result(job_id, &output.transcript, &output.suggested_filename)
                    .await
                    .map_err(WorkerError::Repository)?;
                self.update_status(job_id, JobStatus::Completed, None)
                    .await?;
                tracing::info!(
                    segments = output.segments_total,
                    failed = output.segments_failed,
                    "Transcription completed"
                );
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                self.update_status(job_id, JobStatus::Failed, Some(&error_msg))
                    .await?;
                Err(WorkerError::Pipeline(e))
            }
        }
    }

    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), WorkerError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_repository
            .update_status(job_id, status, error_message)
            .await
            .map_err(WorkerError::Repository)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("pipeline: {0}")]
    Pipeline(PipelineError),
    #[error("repository: {0}")]
    Repository(crate::application::ports::RepositoryError),
}

/// Forwards pipeline progress into the job record so the status endpoint can
/// surface it.
struct RepositoryProgressSink {
    job_id: JobId,
    repository: Arc<dyn JobRepository>,
}

#[async_trait]
impl ProgressSink for RepositoryProgressSink {
    async fn report(&self, fraction: f32, status: &str) {
        if let Err(e) = self
            .repository
            .update_progress(self.job_id, fraction.clamp(0.0, 1.0), status)
            .await
        {
            tracing::warn!(error = %e, "Failed to record job progress");
        }
    }
}
