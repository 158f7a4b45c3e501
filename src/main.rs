use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use voxrelay::application::services::RelayService;
use voxrelay::infrastructure::audio::FfmpegTranscoder;
use voxrelay::infrastructure::observability::{init_tracing, TracingConfig};
use voxrelay::infrastructure::speech::{RecognizerConfig, RecognizerFactory};
use voxrelay::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::default());
    let settings = Settings::from_env();

    let transcoder = Arc::new(FfmpegTranscoder::new(
        settings.transcode.ffmpeg_path.clone(),
        settings.transcode.timeout(),
    ));

    let recognizer = RecognizerFactory::create(
        settings.speech.provider,
        RecognizerConfig {
            language: settings.speech.language.clone(),
            timeout: settings.speech.timeout(),
            azure_key: settings.speech.azure_key.clone(),
            azure_base_url: settings.speech.azure_base_url(),
            soniox_api_key: settings.speech.soniox_api_key.clone(),
            soniox_base_url: settings.speech.soniox_base_url.clone(),
            soniox_model: settings.speech.soniox_model.clone(),
            poll_interval: settings.speech.poll_interval(),
            max_poll_attempts: settings.speech.max_poll_attempts,
        },
    );

    let relay_service = Arc::new(RelayService::new(transcoder, recognizer));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let provider = settings.speech.provider;

    let state = AppState {
        relay_service,
        settings,
    };
    let router = create_router(state);

    tracing::info!(%addr, ?provider, "stt relay listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
