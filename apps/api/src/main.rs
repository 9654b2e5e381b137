use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use prepai_api::analysis::Pipeline;
use prepai_api::config::Config;
use prepai_api::llm_client::{self, LlmClient};
use prepai_api::resume::PdfTextExtractor;
use prepai_api::routes::build_router;
use prepai_api::state::AppState;
use prepai_api::{results, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    telemetry::init(&config.rust_log);

    info!("Starting PrepAI API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm_client::MODEL,
        config.llm_timeout
    );

    // Initialize results store (Redis when REDIS_URL is set)
    let results = results::connect(config.redis_url.as_deref()).await?;

    let state = AppState {
        pipeline: Pipeline::new(Arc::new(llm)),
        documents: Arc::new(PdfTextExtractor),
        results,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
