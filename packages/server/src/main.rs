// Main entry point for the PII detection service

use anyhow::{Context, Result};
use server_core::{build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,detection=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // .env is optional
    dotenvy::dotenv().ok();

    tracing::info!("Starting PII detection service");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        accept = config.deterministic_threshold,
        review = config.llm_trigger_threshold,
        timeout_s = config.llm_timeout_seconds,
        model = %config.ollama_model,
        "Configuration loaded"
    );

    let app = build_app(&config).context("Failed to build application")?;

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
