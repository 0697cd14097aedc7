mod analyzer;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analyzer::extractor::RequirementExtractor;
use crate::analyzer::heuristics::Heuristics;
use crate::analyzer::matcher::MatchAssist;
use crate::analyzer::normalizer::PostingNormalizer;
use crate::config::Config;
use crate::llm_client::LlmAssist;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));

    // Compile normalizer/extractor regexes once, shared across requests.
    let normalizer = Arc::new(PostingNormalizer::new());
    let extractor = Arc::new(RequirementExtractor::new());

    // Optional LLM assist; absence means deterministic-only matching.
    let assist: Option<Arc<dyn MatchAssist>> = match &config.anthropic_api_key {
        Some(key) => {
            info!("LLM assist enabled (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmAssist::new(key.clone())))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; running deterministic matching only");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        heuristics: Heuristics::default(),
        normalizer,
        extractor,
        assist,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
