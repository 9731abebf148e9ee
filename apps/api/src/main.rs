mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod tasks;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tasks::extractor::TaskExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Task Analyzer v{}", env!("CARGO_PKG_VERSION"));

    let extractor = build_extractor(&config);

    let state = AppState { extractor };

    // Build router
    let app = build_router(state, &config.static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front page has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the extractor once at startup. A missing key or a client that fails
/// to build leaves the extractor unavailable; the server still starts.
fn build_extractor(config: &Config) -> TaskExtractor {
    let Some(api_key) = config.openai_api_key.clone() else {
        warn!("OPENAI_API_KEY is not set; /analyze-task will refuse requests");
        return TaskExtractor::unavailable();
    };

    match LlmClient::new(
        api_key,
        &config.openai_base_url,
        Duration::from_secs(config.openai_timeout_secs),
    ) {
        Ok(llm) => {
            info!(
                "LLM client initialized (model: {}, timeout: {}s)",
                llm_client::MODEL,
                config.openai_timeout_secs
            );
            TaskExtractor::new(Arc::new(llm))
        }
        Err(e) => {
            error!("Error initializing OpenAI client: {e}");
            TaskExtractor::unavailable()
        }
    }
}
