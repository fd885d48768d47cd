use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::application::ports::{ProgressSink, TranscriptionClient, TranscriptionError};
use crate::domain::{SegmentArtifact, SegmentFailure, SegmentOutcome, TranscriptionResult};

/// Progress band the dispatcher reports within; the stages before it own
/// the lower fractions.
const PROGRESS_FLOOR: f32 = 0.25;
const PROGRESS_CEILING: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Sequential,
    Concurrent { limit: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Credentials rejected. All segments share one credential, so the job
    /// fails fast instead of burning the remaining segments.
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("dispatch task failed: {0}")]
    TaskFailed(String),
}

/// Sends compliant artifacts to the remote service and reassembles the
/// results in chronological order regardless of completion order.
pub struct TranscriptionDispatcher {
    client: Arc<dyn TranscriptionClient>,
}

impl TranscriptionDispatcher {
    pub fn new(client: Arc<dyn TranscriptionClient>) -> Self {
        Self { client }
    }

    pub async fn dispatch(
        &self,
        artifacts: Vec<SegmentArtifact>,
        language: &str,
        mode: DispatchMode,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<TranscriptionResult>, DispatchError> {
        match mode {
            DispatchMode::Sequential => {
                self.dispatch_sequential(artifacts, language, progress).await
            }
            DispatchMode::Concurrent { limit } => {
                self.dispatch_concurrent(artifacts, language, limit.max(1), progress)
                    .await
            }
        }
    }

    async fn dispatch_sequential(
        &self,
        artifacts: Vec<SegmentArtifact>,
        language: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<TranscriptionResult>, DispatchError> {
        let total = artifacts.len();
        let mut results = Vec::with_capacity(total);

        for (index, artifact) in artifacts.into_iter().enumerate() {
            let outcome =
                transcribe_artifact(self.client.as_ref(), language, index, &artifact).await?;
            results.push(TranscriptionResult { index, outcome });
            report_progress(progress, index + 1, total).await;
        }

        Ok(results)
    }

    async fn dispatch_concurrent(
        &self,
        artifacts: Vec<SegmentArtifact>,
        language: &str,
        limit: usize,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<TranscriptionResult>, DispatchError> {
        let total = artifacts.len();
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks: JoinSet<Result<(usize, SegmentOutcome), DispatchError>> = JoinSet::new();

        for (index, artifact) in artifacts.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let client = Arc::clone(&self.client);
            let language = language.to_string();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| DispatchError::TaskFailed("semaphore closed".to_string()))?;
                let outcome =
                    transcribe_artifact(client.as_ref(), &language, index, &artifact).await?;
                Ok((index, outcome))
            });
        }

        // Each result lands in its pre-sized slot, so chronological order is
        // structural rather than a property of completion order.
        let mut slots: Vec<Option<SegmentOutcome>> = vec![None; total];
        let mut resolved = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((index, outcome))) => {
                    slots[index] = Some(outcome);
                    resolved += 1;
                    report_progress(progress, resolved, total).await;
                }
                Ok(Err(fatal)) => {
                    tasks.abort_all();
                    return Err(fatal);
                }
                Err(join_err) if join_err.is_cancelled() => {}
                Err(join_err) => {
                    tasks.abort_all();
                    return Err(DispatchError::TaskFailed(join_err.to_string()));
                }
            }
        }

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| TranscriptionResult {
                index,
                outcome: slot.unwrap_or_else(|| {
                    SegmentOutcome::Failed(SegmentFailure::Transient(
                        "segment task never resolved".to_string(),
                    ))
                }),
            })
            .collect())
    }
}

/// Call the remote service for one artifact, absorbing per-segment failures
/// into failure-marker outcomes. Only authentication errors escape, because
/// they doom every remaining segment. The artifact file is deleted as soon
/// as its result is recorded, keeping storage bounded by in-flight work.
async fn transcribe_artifact(
    client: &dyn TranscriptionClient,
    language: &str,
    index: usize,
    artifact: &SegmentArtifact,
) -> Result<SegmentOutcome, DispatchError> {
    let audio = match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(index, error = %e, "Failed to read segment artifact");
            return Ok(SegmentOutcome::Failed(SegmentFailure::Transient(format!(
                "artifact unreadable: {}",
                e
            ))));
        }
    };

    let outcome = match client.transcribe(&audio, language).await {
        Ok(text) => SegmentOutcome::Text(text),
        Err(TranscriptionError::Transient(msg)) => {
            tracing::warn!(index, error = %msg, "Segment transcription failed transiently");
            SegmentOutcome::Failed(SegmentFailure::Transient(msg))
        }
        Err(TranscriptionError::PayloadTooLarge(msg)) => {
            tracing::warn!(
                index,
                bytes = artifact.byte_size,
                oversize_flagged = artifact.oversize,
                "Remote service rejected segment payload as too large"
            );
            SegmentOutcome::Failed(SegmentFailure::PayloadTooLarge(msg))
        }
        Err(TranscriptionError::Authentication(msg)) => {
            delete_artifact(artifact).await;
            return Err(DispatchError::Authentication(msg));
        }
    };

    delete_artifact(artifact).await;
    Ok(outcome)
}

async fn delete_artifact(artifact: &SegmentArtifact) {
    if let Err(e) = tokio::fs::remove_file(&artifact.path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %artifact.path.display(), error = %e, "Failed to delete segment artifact");
        }
    }
}

async fn report_progress(progress: &dyn ProgressSink, resolved: usize, total: usize) {
    let fraction = if total == 0 {
        PROGRESS_CEILING
    } else {
        PROGRESS_FLOOR + (PROGRESS_CEILING - PROGRESS_FLOOR) * resolved as f32 / total as f32
    };
    progress
        .report(
            fraction,
            &format!("Transcribed segment {} of {}", resolved, total),
        )
        .await;
}
