use async_trait::async_trait;

use crate::domain::{Job, JobId, JobStatus};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn update_progress(
        &self,
        id: JobId,
        progress: f32,
        detail: &str,
    ) -> Result<(), RepositoryError>;

    async fn store_result(
        &self,
        id: JobId,
        transcript: &str,
        suggested_filename: &str,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("repository operation failed: {0}")]
    OperationFailed(String),
}
