use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use bytes::Bytes;
use serde::Serialize;

use crate::application::services::{DispatchMode, TranscriptionJobMessage};
use crate::domain::{Job, SourceFormat};
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Accept an audio upload, stage it on disk, and enqueue a transcription
/// job. Responds immediately; the transcript is fetched via the job
/// endpoints.
#[tracing::instrument(skip(state, request_id, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut filename: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut language: Option<String> = None;
    let mut mode_field: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(|n| n.to_string());
                data = match field.bytes().await {
                    Ok(d) => Some(d),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read file bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read file: {}", e),
                            }),
                        )
                            .into_response();
                    }
                };
            }
            Some("language") => {
                language = field.text().await.ok().filter(|t| !t.trim().is_empty());
            }
            Some("mode") => {
                mode_field = field.text().await.ok();
            }
            _ => {}
        }
    }

    let (filename, data) = match (filename, data) {
        (Some(f), Some(d)) => (f, d),
        _ => {
            tracing::warn!("Transcription request with no file field");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
    };

    let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    let source_format = match SourceFormat::from_extension(extension) {
        Some(fmt) => fmt,
        None => {
            tracing::warn!(filename = %filename, "Unsupported audio format");
            return (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse {
                    error: format!("Unsupported audio format: {}", filename),
                }),
            )
                .into_response();
        }
    };

    let max_bytes = state.settings.upload.max_upload_bytes();
    if data.len() as u64 > max_bytes {
        tracing::warn!(bytes = data.len(), max_bytes, "Upload over size limit");
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse {
                error: format!(
                    "File exceeds the {} MB upload limit",
                    state.settings.upload.max_upload_mb
                ),
            }),
        )
            .into_response();
    }

    let mode = match mode_field.as_deref() {
        Some("sequential") => DispatchMode::Sequential,
        Some("concurrent") => DispatchMode::Concurrent {
            limit: state.settings.dispatch.concurrency,
        },
        None => state.settings.dispatch.mode,
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid mode: {}. Expected: sequential or concurrent", other),
                }),
            )
                .into_response();
        }
    };

    // Stage under a job-scoped temp dir; the workspace travels with the
    // message and is deleted when the job finishes either way.
    let workspace = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create job workspace");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create job workspace".to_string(),
                }),
            )
                .into_response();
        }
    };

    let staged_path = workspace
        .path()
        .join(format!("upload.{}", source_format.as_str()));
    if let Err(e) = tokio::fs::write(&staged_path, &data).await {
        tracing::error!(error = %e, "Failed to stage uploaded file");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to stage uploaded file".to_string(),
            }),
        )
            .into_response();
    }

    let job = Job::new(filename.clone());
    let job_id = job.id;

    if let Err(e) = state.job_repository.create(&job).await {
        tracing::error!(error = %e, "Failed to create job record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create job: {}", e),
            }),
        )
            .into_response();
    }

    let msg = TranscriptionJobMessage {
        job_id,
        filename: filename.clone(),
        language: language.unwrap_or_else(|| state.settings.transcription.language.clone()),
        mode,
        staged_path,
        workspace,
    };

    if let Err(e) = state.job_sender.send(msg).await {
        tracing::error!(error = %e, "Failed to enqueue transcription job");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Transcription queue full or worker unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(
        job_id = %job_id.as_uuid(),
        request_id = %request_id.as_str(),
        filename = %filename,
        bytes = data.len(),
        "Transcription job enqueued"
    );

    (
        StatusCode::ACCEPTED,
        Json(TranscribeResponse {
            job_id: job_id.as_uuid().to_string(),
            status: "QUEUED".to_string(),
            message: "Transcription started".to_string(),
        }),
    )
        .into_response()
}
