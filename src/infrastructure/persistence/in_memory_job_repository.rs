use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus};

/// Process-local job store. Jobs do not survive a restart; durability is an
/// explicit non-goal of this service.
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    async fn modify<F>(&self, id: JobId, mutate: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        mutate(job);
        job.updated_at = Utc::now();
        Ok(())
    }
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |job| {
            job.status = status;
            job.error_message = error_message.map(String::from);
            if status == JobStatus::Completed {
                job.progress = 1.0;
            }
        })
        .await
    }

    async fn update_progress(
        &self,
        id: JobId,
        progress: f32,
        detail: &str,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |job| {
            job.progress = progress.clamp(0.0, 1.0);
            job.progress_detail = detail.to_string();
        })
        .await
    }

    async fn store_result(
        &self,
        id: JobId,
        transcript: &str,
        suggested_filename: &str,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |job| {
            job.transcript = Some(transcript.to_string());
            job.suggested_filename = Some(suggested_filename.to_string());
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_update_roundtrips() {
        let repo = InMemoryJobRepository::new();
        let job = Job::new("audio.mp3".to_string());
        let id = job.id;

        repo.create(&job).await.unwrap();
        repo.update_progress(id, 0.4, "Transcribing segment 2 of 5")
            .await
            .unwrap();
        repo.update_status(id, JobStatus::Completed, None)
            .await
            .unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        assert_eq!(stored.progress, 1.0);
        assert_eq!(stored.progress_detail, "Transcribing segment 2 of 5");
    }

    #[tokio::test]
    async fn updating_unknown_job_reports_not_found() {
        let repo = InMemoryJobRepository::new();
        let result = repo.update_progress(JobId::new(), 0.5, "x").await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
