use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use lydskrift::application::ports::{TranscriptionClient, TranscriptionError};
use lydskrift::infrastructure::transcription::OpenAiTranscriptionClient;

async fn start_mock_api_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/audio/transcriptions",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn client(base_url: &str, api_key: &str) -> OpenAiTranscriptionClient {
    OpenAiTranscriptionClient::new(api_key.to_string(), Some(base_url.to_string()), None)
}

#[tokio::test]
async fn given_successful_response_when_transcribing_then_returns_trimmed_text() {
    let (base_url, shutdown_tx) = start_mock_api_server(200, "  hello world \n").await;

    let result = client(&base_url, "test-key")
        .transcribe(b"fake wav bytes", "pt")
        .await;

    assert_eq!(result.unwrap(), "hello world");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_payload_too_large_response_when_transcribing_then_maps_to_payload_error() {
    let (base_url, shutdown_tx) = start_mock_api_server(413, "Maximum content size exceeded").await;

    let result = client(&base_url, "test-key")
        .transcribe(b"fake wav bytes", "pt")
        .await;

    assert!(matches!(result, Err(TranscriptionError::PayloadTooLarge(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unauthorized_response_when_transcribing_then_maps_to_authentication_error() {
    let (base_url, shutdown_tx) = start_mock_api_server(401, "Incorrect API key provided").await;

    let result = client(&base_url, "bad-key")
        .transcribe(b"fake wav bytes", "pt")
        .await;

    assert!(matches!(result, Err(TranscriptionError::Authentication(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_response_when_transcribing_then_maps_to_transient_error() {
    let (base_url, shutdown_tx) = start_mock_api_server(500, "internal error").await;

    let result = client(&base_url, "test-key")
        .transcribe(b"fake wav bytes", "pt")
        .await;

    assert!(matches!(result, Err(TranscriptionError::Transient(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_api_key_when_transcribing_then_fails_without_network_call() {
    let result = client("http://127.0.0.1:1", "  ")
        .transcribe(b"fake wav bytes", "pt")
        .await;

    assert!(matches!(result, Err(TranscriptionError::Authentication(_))));
}
