//! Application setup and router configuration.

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use detection::{OllamaArbiter, PatternDetector, Pipeline, RemoteNerDetector};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::routes::{analyze_handler, analyze_view_handler, health_handler, AppState};

/// Build the detection pipeline from configuration.
///
/// The pattern detector is always registered; the statistical NER
/// adapter only when a sidecar URL is configured. An invalid threshold
/// configuration fails startup here.
pub fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline<OllamaArbiter>> {
    let arbiter = OllamaArbiter::new(
        config.ollama_base_url.clone(),
        config.ollama_model.clone(),
        config.llm_timeout(),
    );

    let mut pipeline = Pipeline::new(arbiter, config.pipeline_config())?
        .with_detector(Arc::new(PatternDetector::new()));

    if let Some(ner_url) = &config.ner_base_url {
        pipeline = pipeline.with_detector(Arc::new(RemoteNerDetector::new(ner_url.clone())));
    } else {
        tracing::info!("No NER sidecar configured; pattern recognizers only");
    }

    Ok(pipeline)
}

/// Build the Axum application router.
pub fn build_app(config: &Config) -> anyhow::Result<Router> {
    let state = AppState {
        pipeline: Arc::new(build_pipeline(config)?),
    };

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&config.allowed_origins)?)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Ok(Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/analyze/view", post(analyze_view_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn allowed_origins(origins: &[String]) -> anyhow::Result<AllowOrigin> {
    if origins.iter().any(|o| o == "*") {
        return Ok(AllowOrigin::any());
    }
    let parsed: Result<Vec<HeaderValue>, _> =
        origins.iter().map(|o| o.parse::<HeaderValue>()).collect();
    Ok(AllowOrigin::list(parsed?))
}
