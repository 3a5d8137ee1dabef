//! Adforge API server entry point.

use adforge_pipeline::{GenerationOrchestrator, PipelineConfig};
use adforge_providers::{OpenAiClient, OpenAiConfig};
use adforge_server::{router, AppState};
use adforge_store::{MemoryContextStore, MemoryJobStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    adforge_core::init_telemetry()?;

    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| "OPENAI_API_KEY environment variable is required")?;
    let model =
        std::env::var("ADFORGE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

    let pipeline_config = PipelineConfig::load()?;
    let driver = Arc::new(OpenAiClient::new(
        OpenAiConfig::builder()
            .api_key(api_key)
            .model(model)
            .build()
            .map_err(|e| e.to_string())?,
    )?);

    let jobs = Arc::new(MemoryJobStore::new());
    let contexts = Arc::new(MemoryContextStore::default());
    let orchestrator = Arc::new(GenerationOrchestrator::new(
        driver,
        jobs.clone(),
        contexts,
        pipeline_config,
    ));

    let app = router(AppState {
        orchestrator,
        jobs,
    });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "Starting Adforge API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
