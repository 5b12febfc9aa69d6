mod config;
mod credentials;
mod errors;
mod extraction;
mod matching;
mod openai;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::CredentialChain;
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

    info!("Starting resume-match API v{}", env!("CARGO_PKG_VERSION"));

    // Long-lived connection pool with a per-call timeout; each upstream call
    // is attempted once, so the timeout bounds the worst case directly.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.analysis_timeout_secs))
        .build()?;

    // Credential providers: secrets file (if configured), then environment.
    let credentials = Arc::new(CredentialChain::default_chain(config.secrets_file.as_deref()));
    info!(
        "Credential chain ready (models: embed={}, generate={})",
        config.embedding_model, config.generation_model
    );

    let state = AppState {
        http,
        credentials,
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
