mod config;
mod errors;
mod llm_client;
mod ratelimit;
mod rejection;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::ratelimit::RateLimiter;
use crate::rejection::coach::{RateLimits, RejectionCoach};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting WhyNot API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_api_url.clone(),
        config.llm_api_token.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (endpoint: {}, timeout: {}s)",
        llm.api_url(),
        config.llm_timeout_secs
    );

    // Rate limiter state lives for the process lifetime only
    let limits = RateLimits {
        explain_per_window: config.explain_rate_limit,
        patterns_per_window: config.pattern_rate_limit,
        window_ms: config.rate_window_ms,
    };
    info!(
        "Rate limits: explain={}/window, patterns={}/window, window={}ms",
        limits.explain_per_window, limits.patterns_per_window, limits.window_ms
    );

    let coach = RejectionCoach::new(
        Arc::new(llm),
        Arc::new(RateLimiter::with_system_clock()),
        limits,
    );

    // Build app state
    let state = AppState {
        coach: Arc::new(coach),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the portal's deployed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
