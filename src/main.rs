use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use nativity::application::services::{PipelineCollaborators, PipelineOrchestrator};
use nativity::infrastructure::analysis::AnalyzerFactory;
use nativity::infrastructure::media::MediaEngineFactory;
use nativity::infrastructure::observability::{TracingConfig, init_tracing};
use nativity::infrastructure::persistence::{HistoryStoreFactory, InMemoryJobRegistry};
use nativity::infrastructure::speech::SpeechSynthesizerFactory;
use nativity::infrastructure::storage::VideoStoreFactory;
use nativity::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        &settings.logging,
        environment.as_str(),
    ))
    .context("Failed to install tracing subscriber")?;

    let store = VideoStoreFactory::create(&settings.storage).context("Failed to create video store")?;
    let analyzer =
        AnalyzerFactory::create(&settings.analyzer).context("Failed to create content analyzer")?;
    let synthesizer = SpeechSynthesizerFactory::create(&settings.speech);
    let media = MediaEngineFactory::create(&settings.media).await;
    let history = HistoryStoreFactory::create(&settings.history)
        .await
        .context("Failed to create history store")?;

    let orchestrator = PipelineOrchestrator::new(
        PipelineCollaborators {
            registry: Arc::new(InMemoryJobRegistry::new()),
            store,
            analyzer,
            synthesizer,
            media,
            history,
        },
        settings.pipeline.to_pipeline_settings(settings.speech.concurrency),
    );

    let capabilities = orchestrator.capabilities();
    tracing::info!(
        environment = %environment,
        storage = capabilities.storage,
        analyzer = capabilities.analyzer,
        speech = capabilities.speech,
        history = capabilities.history,
        media = capabilities.media,
        "Pipeline assembled"
    );

    let router = create_router(AppState::new(orchestrator));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
