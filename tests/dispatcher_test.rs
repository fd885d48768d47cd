use std::path::Path;
use std::sync::Arc;

use lydskrift::application::ports::{
    NullProgressSink, TranscriptionClient, TranscriptionError,
};
use lydskrift::application::services::{DispatchError, DispatchMode, TranscriptionDispatcher};
use lydskrift::domain::{assemble_transcript, ExportParams, SegmentArtifact, SegmentRange};

/// Client scripted by segment content: `fail` is a transient error, `huge`
/// a payload rejection, `badkey` an authentication failure, anything else
/// transcribes to its uppercase form.
struct ScriptedClient;

#[async_trait::async_trait]
impl TranscriptionClient for ScriptedClient {
    async fn transcribe(&self, audio: &[u8], _language: &str) -> Result<String, TranscriptionError> {
        let content = String::from_utf8_lossy(audio);
        match content.as_ref() {
            "fail" => Err(TranscriptionError::Transient("simulated timeout".into())),
            "huge" => Err(TranscriptionError::PayloadTooLarge("simulated 413".into())),
            "badkey" => Err(TranscriptionError::Authentication("simulated 401".into())),
            other => Ok(other.to_uppercase()),
        }
    }
}

async fn write_artifacts(dir: &Path, contents: &[&str]) -> Vec<SegmentArtifact> {
    let mut artifacts = Vec::new();
    for (i, content) in contents.iter().enumerate() {
        let start = i as u64 * 1_000;
        let path = dir.join(format!("seg_{}.wav", i));
        tokio::fs::write(&path, content).await.expect("write artifact");
        artifacts.push(SegmentArtifact {
            path,
            range: SegmentRange::new(start, start + 1_000),
            byte_size: content.len() as u64,
            params: ExportParams::new(44_100, 1),
            oversize: false,
        });
    }
    artifacts
}

fn dispatcher() -> TranscriptionDispatcher {
    TranscriptionDispatcher::new(Arc::new(ScriptedClient))
}

#[tokio::test]
async fn given_sequential_mode_when_dispatching_then_results_follow_segment_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifacts = write_artifacts(dir.path(), &["alpha", "beta", "gamma"]).await;

    let results = dispatcher()
        .dispatch(artifacts, "pt", DispatchMode::Sequential, &NullProgressSink)
        .await
        .expect("dispatch failed");

    assert_eq!(assemble_transcript(&results), "ALPHA BETA GAMMA");
}

#[tokio::test]
async fn given_concurrent_mode_when_dispatching_then_transcript_matches_sequential() {
    let dir = tempfile::tempdir().expect("tempdir");
    let contents = ["one", "two", "three", "four", "five", "six"];

    let sequential = dispatcher()
        .dispatch(
            write_artifacts(dir.path(), &contents).await,
            "pt",
            DispatchMode::Sequential,
            &NullProgressSink,
        )
        .await
        .expect("sequential dispatch failed");

    let concurrent = dispatcher()
        .dispatch(
            write_artifacts(dir.path(), &contents).await,
            "pt",
            DispatchMode::Concurrent { limit: 2 },
            &NullProgressSink,
        )
        .await
        .expect("concurrent dispatch failed");

    assert_eq!(
        assemble_transcript(&sequential),
        assemble_transcript(&concurrent)
    );
}

#[tokio::test]
async fn given_transient_failure_when_dispatching_then_marker_fills_the_gap() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifacts = write_artifacts(dir.path(), &["before", "fail", "after"]).await;

    let results = dispatcher()
        .dispatch(artifacts, "pt", DispatchMode::Sequential, &NullProgressSink)
        .await
        .expect("dispatch failed");

    assert_eq!(
        assemble_transcript(&results),
        "BEFORE [transcription failed] AFTER"
    );
}

#[tokio::test]
async fn given_payload_rejection_when_dispatching_then_distinct_marker_is_used() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifacts = write_artifacts(dir.path(), &["ok", "huge"]).await;

    let results = dispatcher()
        .dispatch(
            artifacts,
            "pt",
            DispatchMode::Concurrent { limit: 4 },
            &NullProgressSink,
        )
        .await
        .expect("dispatch failed");

    assert_eq!(
        assemble_transcript(&results),
        "OK [segment too large for transcription service]"
    );
}

#[tokio::test]
async fn given_authentication_failure_when_dispatching_then_job_fails_fast() {
    let dir = tempfile::tempdir().expect("tempdir");

    for mode in [DispatchMode::Sequential, DispatchMode::Concurrent { limit: 2 }] {
        let artifacts = write_artifacts(dir.path(), &["badkey", "later"]).await;
        let result = dispatcher()
            .dispatch(artifacts, "pt", mode, &NullProgressSink)
            .await;
        assert!(matches!(result, Err(DispatchError::Authentication(_))));
    }
}

#[tokio::test]
async fn given_resolved_segments_when_dispatching_then_artifact_files_are_deleted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifacts = write_artifacts(dir.path(), &["a", "fail", "c"]).await;
    let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();

    dispatcher()
        .dispatch(artifacts, "pt", DispatchMode::Sequential, &NullProgressSink)
        .await
        .expect("dispatch failed");

    for path in paths {
        assert!(!path.exists(), "artifact {} should be deleted", path.display());
    }
}

#[tokio::test]
async fn given_empty_plan_when_dispatching_then_transcript_is_empty() {
    let results = dispatcher()
        .dispatch(
            Vec::new(),
            "pt",
            DispatchMode::Concurrent { limit: 4 },
            &NullProgressSink,
        )
        .await
        .expect("dispatch failed");

    assert!(results.is_empty());
    assert_eq!(assemble_transcript(&results), "");
}
