use async_trait::async_trait;

/// Injected callback for fractional progress and a free-text status line.
///
/// The pipeline calls it at well-defined points (normalization done, plan
/// complete, each segment compliance-checked, each segment transcribed) and
/// has no dependency on how the values are rendered.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, fraction: f32, status: &str);
}

/// Sink that drops every report. Useful in tests.
pub struct NullProgressSink;

#[async_trait]
impl ProgressSink for NullProgressSink {
    async fn report(&self, _fraction: f32, _status: &str) {}
}
