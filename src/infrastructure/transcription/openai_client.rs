use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use crate::application::ports::{TranscriptionClient, TranscriptionError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "whisper-1";
const REQUEST_TIMEOUT_SECS: u64 = 300;
const BODY_PREVIEW_CHARS: usize = 240;

/// OpenAI speech-to-text client for `/audio/transcriptions`.
pub struct OpenAiTranscriptionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTranscriptionClient {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn classify_status(status: StatusCode, body: &str) -> TranscriptionError {
    let preview = truncate_body(body);
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => {
            TranscriptionError::PayloadTooLarge(format!("status {}: {}", status, preview))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TranscriptionError::Authentication(format!("status {}: {}", status, preview))
        }
        _ => TranscriptionError::Transient(format!("status {}: {}", status, preview)),
    }
}

#[async_trait]
impl TranscriptionClient for OpenAiTranscriptionClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        language: &str,
    ) -> Result<String, TranscriptionError> {
        if self.api_key.trim().is_empty() {
            return Err(TranscriptionError::Authentication(
                "API key is missing".to_string(),
            ));
        }

        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = Part::bytes(audio.to_vec())
            .file_name("segment.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Transient(format!("mime: {}", e)))?;

        let mut form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        if !language.trim().is_empty() {
            form = form.text("language", language.trim().to_string());
        }

        tracing::debug!(
            model = %self.model,
            bytes = audio.len(),
            "Sending segment to transcription API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Transient(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_status(status, &body));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| TranscriptionError::Transient(format!("body: {}", e)))?;

        tracing::debug!(chars = transcript.len(), "Segment transcription completed");

        Ok(transcript.trim().to_string())
    }
}
