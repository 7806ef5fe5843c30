use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use metagrafi::application::ports::{AudioStagingStore, ChatClient};
use metagrafi::application::services::{RefinementService, TranscriptionService};
use metagrafi::infrastructure::audio::build_provider_candidates;
use metagrafi::infrastructure::llm::OpenAiChatClient;
use metagrafi::infrastructure::observability::{TracingConfig, init_tracing};
use metagrafi::infrastructure::storage::LocalStagingStore;
use metagrafi::presentation::config::Environment;
use metagrafi::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment).map_err(|e| anyhow::anyhow!(e))?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            json_format: settings.logging.json_format,
        },
        settings.server.port,
    );

    let staging_store: Arc<dyn AudioStagingStore> = Arc::new(
        LocalStagingStore::new(settings.storage.staging_dir.clone().into())
            .map_err(|e| anyhow::anyhow!("staging store: {}", e))?,
    );

    let candidates = build_provider_candidates(&settings.transcription)
        .map_err(|e| anyhow::anyhow!("transcription providers: {}", e))?;

    let transcription_service = Arc::new(TranscriptionService::new(
        candidates,
        Arc::clone(&staging_store),
        settings.transcription.max_attempts,
        Duration::from_secs(settings.transcription.attempt_timeout_secs),
    ));

    let chat_client = settings.chat.api_key.clone().map(|api_key| {
        Arc::new(OpenAiChatClient::new(
            api_key,
            settings.chat.base_url.clone(),
            settings.chat.model.clone(),
        )) as Arc<dyn ChatClient>
    });
    let refinement_service = Arc::new(RefinementService::new(chat_client));

    let state = AppState {
        transcription_service,
        refinement_service,
        staging_store,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address: {}", e))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
