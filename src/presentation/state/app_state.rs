use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::JobRepository;
use crate::application::services::TranscriptionJobMessage;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub job_repository: Arc<dyn JobRepository>,
    pub job_sender: mpsc::Sender<TranscriptionJobMessage>,
    pub settings: Settings,
}
