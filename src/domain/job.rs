use chrono::{DateTime, Utc};

use super::{JobId, JobStatus};

/// Per-request state for one transcription job.
///
/// Created when the upload is accepted and updated by the background worker
/// as the pipeline advances. `progress` is a fraction in `[0.0, 1.0]`;
/// `progress_detail` is a free-text status line for display.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub filename: String,
    pub status: JobStatus,
    pub progress: f32,
    pub progress_detail: String,
    pub transcript: Option<String>,
    pub suggested_filename: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(filename: String) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            filename,
            status: JobStatus::Queued,
            progress: 0.0,
            progress_detail: "Queued".to_string(),
            transcript: None,
            suggested_filename: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
