use async_trait::async_trait;

/// Remote speech-to-text service boundary.
///
/// Takes one compliant (or overflow-flagged) audio payload and a language
/// code; returns the transcribed text.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(&self, audio: &[u8], language: &str)
        -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Network failure or a retryable service error. Recorded as a failure
    /// marker for the affected segment; the job continues.
    #[error("transient service error: {0}")]
    Transient(String),
    /// HTTP 413: the payload exceeded the service's hard budget despite the
    /// size-compliance pass. Recorded with a distinguishing marker.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    /// Invalid or missing credentials. All segments share one credential, so
    /// this is fatal and cancels remaining work.
    #[error("authentication failed: {0}")]
    Authentication(String),
}
