use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use lydskrift::application::services::{
    FormatNormalizer, SizeComplianceLoop, TranscriptionDispatcher, TranscriptionPipeline,
    TranscriptionWorker,
};
use lydskrift::infrastructure::audio::{
    check_ffmpeg_binary, FfmpegConverter, SymphoniaConverter, WavSegmentExporter,
};
use lydskrift::infrastructure::observability::{init_tracing, TracingConfig};
use lydskrift::infrastructure::persistence::InMemoryJobRepository;
use lydskrift::infrastructure::transcription::OpenAiTranscriptionClient;
use lydskrift::presentation::{create_router, AppState, Settings};

const JOB_QUEUE_CAPACITY: usize = 16;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(TracingConfig::from_env(), settings.server.port);

    if let Err(e) = check_ffmpeg_binary() {
        tracing::warn!(error = %e, "ffmpeg unavailable, conversions will use the in-process decoder");
    }

    let job_repository = Arc::new(InMemoryJobRepository::new());

    let normalizer = FormatNormalizer::new(
        Arc::new(FfmpegConverter::new()),
        Arc::new(SymphoniaConverter::new()),
    );
    let compliance = SizeComplianceLoop::new(
        Arc::new(WavSegmentExporter::new()),
        settings.compliance_config(),
    );
    let dispatcher = TranscriptionDispatcher::new(Arc::new(OpenAiTranscriptionClient::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        Some(settings.transcription.model.clone()),
    )));
    let pipeline = Arc::new(TranscriptionPipeline::new(
        normalizer,
        settings.planner_config(),
        compliance,
        dispatcher,
    ));

    let (job_sender, job_receiver) = mpsc::channel(JOB_QUEUE_CAPACITY);
    let worker = TranscriptionWorker::new(job_receiver, pipeline, job_repository.clone());
    tokio::spawn(worker.run());

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);

    let state = AppState {
        job_repository,
        job_sender,
        settings,
    };
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
