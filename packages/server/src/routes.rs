//! Request handlers for the PII service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use detection::{build_view, AnalysisReport, OllamaArbiter, Pipeline, PipelineError, ReportView};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline<OllamaArbiter>>,
}

/// Incoming payload requesting a PII scan.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Client-facing error body, mirroring the `detail` shape validation
/// errors use.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        // Only input validation ever surfaces; detection-quality
        // degradation is handled inside the pipeline.
        match error {
            PipelineError::InputTooLong { .. } | PipelineError::EmptyInput => {
                Self::unprocessable(error.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// `GET /health`
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /analyze`
///
/// Always answers 200 with best-effort results once the input passes
/// validation; a degraded fallback or detector never fails the request.
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let report = state.pipeline.analyze(&payload.text).await?;
    Ok(Json(report))
}

/// `POST /analyze/view`
///
/// Same analysis as `/analyze`, rendered for display: friendly
/// labels, context excerpts, per-type counts, and a tidied preview.
pub async fn analyze_view_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<ReportView>, ApiError> {
    let report = state.pipeline.analyze(&payload.text).await?;
    Ok(Json(build_view(
        &payload.text,
        &report.entities,
        &report.redacted_text,
    )))
}
