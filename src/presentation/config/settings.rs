use crate::application::services::{ComplianceConfig, DispatchMode, PlannerConfig};

use super::Environment;

const DEFAULT_MAX_UPLOAD_MB: u64 = 200;
const DEFAULT_SEGMENT_BUDGET_MB: u64 = 25;
const DEFAULT_SAFETY_FACTOR: f64 = 0.8;
const DEFAULT_MIN_SEGMENT_SECS: u64 = 30;
const DEFAULT_MAX_SEGMENT_SECS: u64 = 300;
const DEFAULT_MIN_CHILD_SECS: u64 = 5;
const DEFAULT_DISPATCH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub upload: UploadSettings,
    pub segmentation: SegmentationSettings,
    pub dispatch: DispatchSettings,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    /// Default language hint; a per-request field overrides it.
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_upload_mb: u64,
}

impl UploadSettings {
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone)]
pub struct SegmentationSettings {
    pub segment_budget_mb: u64,
    pub safety_factor: f64,
    pub min_segment_secs: u64,
    pub max_segment_secs: u64,
    pub min_child_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Default strategy for jobs that do not request one explicitly.
    pub mode: DispatchMode,
    /// Worker-pool size for concurrent dispatch, kept separately so a
    /// per-request `mode=concurrent` override works even when the default
    /// mode is sequential.
    pub concurrency: usize,
}

impl Settings {
    /// Build settings from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let environment = std::env::var("APP_ENV")
            .ok()
            .and_then(|v| Environment::try_from(v).ok())
            .unwrap_or(Environment::Local);

        let concurrency = parse_var("DISPATCH_CONCURRENCY", DEFAULT_DISPATCH_CONCURRENCY).max(1);
        let mode = match std::env::var("DISPATCH_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "sequential" => DispatchMode::Sequential,
            _ => DispatchMode::Concurrent { limit: concurrency },
        };

        Self {
            server: ServerSettings {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 3000),
            },
            transcription: TranscriptionSettings {
                api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                base_url: std::env::var("OPENAI_BASE_URL").ok(),
                model: std::env::var("TRANSCRIPTION_MODEL")
                    .unwrap_or_else(|_| "whisper-1".to_string()),
                language: std::env::var("TRANSCRIPTION_LANGUAGE")
                    .unwrap_or_else(|_| "pt".to_string()),
            },
            upload: UploadSettings {
                max_upload_mb: parse_var("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB),
            },
            segmentation: SegmentationSettings {
                segment_budget_mb: parse_var("SEGMENT_BUDGET_MB", DEFAULT_SEGMENT_BUDGET_MB),
                safety_factor: parse_var("SEGMENT_SAFETY_FACTOR", DEFAULT_SAFETY_FACTOR),
                min_segment_secs: parse_var("MIN_SEGMENT_SECS", DEFAULT_MIN_SEGMENT_SECS),
                max_segment_secs: parse_var("MAX_SEGMENT_SECS", DEFAULT_MAX_SEGMENT_SECS),
                min_child_secs: parse_var("MIN_CHILD_SECS", DEFAULT_MIN_CHILD_SECS),
            },
            dispatch: DispatchSettings { mode, concurrency },
            environment,
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            target_segment_bytes: self.segmentation.segment_budget_mb * 1024 * 1024,
            safety_factor: self.segmentation.safety_factor,
            min_segment_ms: self.segmentation.min_segment_secs * 1000,
            max_segment_ms: self.segmentation.max_segment_secs * 1000,
        }
    }

    pub fn compliance_config(&self) -> ComplianceConfig {
        ComplianceConfig {
            hard_budget_bytes: self.segmentation.segment_budget_mb * 1024 * 1024,
            min_child_ms: self.segmentation.min_child_secs * 1000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
