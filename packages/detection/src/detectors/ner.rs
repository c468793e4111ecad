//! Statistical NER detector backed by a sidecar model server.
//!
//! The transformer model runs out of process; this adapter only maps
//! its labeled entities into spans. Offsets the model reports are
//! re-validated by the pipeline like any other detector output.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DetectError, DetectResult};
use crate::traits::detector::Detector;
use crate::types::span::{PiiSpan, SpanSource};

/// Detector adapter for an HTTP NER model server.
///
/// Expects a `POST {base}/predict` endpoint taking `{ "text": ... }`
/// and answering `{ "entities": [{label, start, end, score}] }`.
#[derive(Clone)]
pub struct RemoteNerDetector {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    entities: Vec<NerEntity>,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    label: String,
    start: usize,
    end: usize,
    score: f32,
}

impl RemoteNerDetector {
    /// Create an adapter for the model server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn predict(&self, text: &str) -> DetectResult<PredictResponse> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest { text })
            .send()
            .await
            .map_err(|e| DetectError::Http(Box::new(e)))?
            .error_for_status()
            .map_err(|e| DetectError::Http(Box::new(e)))?;

        response
            .json::<PredictResponse>()
            .await
            .map_err(|e| DetectError::MalformedResponse(e.to_string()))
    }
}

/// Map model entities to spans, dropping any whose offsets or scores
/// do not hold up against the source text.
fn spans_from_response(response: PredictResponse, text: &str) -> Vec<PiiSpan> {
    response
        .entities
        .into_iter()
        .filter_map(|entity| {
            match PiiSpan::new(
                entity.label,
                entity.start,
                entity.end,
                entity.score.clamp(0.0, 1.0),
                SpanSource::Statistical,
                text,
            ) {
                Ok(span) => Some(span),
                Err(error) => {
                    debug!(error = %error, "NER entity with invalid offsets ignored");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl Detector for RemoteNerDetector {
    fn name(&self) -> &str {
        "ner"
    }

    async fn detect(&self, text: &str) -> DetectResult<Vec<PiiSpan>> {
        let response = self.predict(text).await?;
        Ok(spans_from_response(response, text))
    }
}
