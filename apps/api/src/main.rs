mod config;
mod errors;
mod llm_client;
mod pipeline;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::pipeline::gateway::GroqCoach;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting reviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the coach gateway. A missing GROQ_API_KEY is not an error:
    // the service starts in degraded mode and every rewrite returns the
    // original bullet unchanged.
    let coach = GroqCoach::new(config.groq_api_key.clone(), config.groq_model.clone())?;
    if coach.is_configured() {
        info!("Coach gateway initialized (model: {})", config.groq_model);
    } else {
        warn!("GROQ_API_KEY not set — running in degraded mode, rewrites are pass-through");
    }

    let state = AppState {
        gateway: Arc::new(coach),
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
