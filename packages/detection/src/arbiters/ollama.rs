//! Ollama implementation of the Arbiter trait.
//!
//! Thin client for a local Ollama runtime. The transport is acquired
//! per call and released on every exit path, so a cancelled or timed
//! out review never leaves a connection behind.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ArbiterError, ArbiterResult};
use crate::traits::arbiter::{Arbiter, ReviewCandidate, SpanVerdict};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL: &str = "qwen2.5:1.5b-instruct-q4_0";

const SYSTEM_PROMPT: &str = "You review candidate PII spans found in a text. \
For each candidate decide whether it is really personally identifiable information. \
Return JSON with a single key 'verdicts' containing a list of objects with keys \
index (the candidate index), confirmed (true/false), entity_type (corrected type or null), \
start, end (corrected byte offsets or null), score (0-1). \
Do not include any extra text. If nothing is PII, confirm none.";

/// Ollama-backed fallback arbiter.
#[derive(Debug, Clone)]
pub struct OllamaArbiter {
    base_url: String,
    model: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct VerdictEnvelope {
    #[serde(default)]
    verdicts: Vec<SpanVerdict>,
}

#[derive(Serialize)]
struct PromptCandidate<'a> {
    index: usize,
    #[serde(rename = "type")]
    entity_type: &'a str,
    start: usize,
    end: usize,
    text: &'a str,
    score: f32,
    context: &'a str,
}

impl Default for OllamaArbiter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, Duration::from_secs(15))
    }
}

impl OllamaArbiter {
    /// Create an arbiter for the Ollama runtime at `base_url`.
    ///
    /// `timeout` bounds the transport; the pipeline applies its own
    /// deadline on top, so both should come from the same config value.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        }
    }

    /// Current model id.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_prompt(&self, candidates: &[ReviewCandidate]) -> String {
        let listed: Vec<PromptCandidate<'_>> = candidates
            .iter()
            .map(|c| PromptCandidate {
                index: c.index,
                entity_type: &c.entity_type,
                start: c.start,
                end: c.end,
                text: &c.text,
                score: c.score,
                context: &c.context,
            })
            .collect();

        format!(
            "{SYSTEM_PROMPT}\nCandidates: {}",
            serde_json::to_string(&listed).unwrap_or_else(|_| "[]".to_string())
        )
    }
}

#[async_trait]
impl Arbiter for OllamaArbiter {
    async fn review(
        &self,
        _text: &str,
        candidates: &[ReviewCandidate],
    ) -> ArbiterResult<Vec<SpanVerdict>> {
        let payload = json!({
            "model": self.model,
            "prompt": self.build_prompt(candidates),
            "stream": false,
            "options": {"temperature": 0},
        });

        // Per-call client: dropping it on any exit path releases the
        // underlying connection.
        let client = reqwest::Client::builder()
            .connect_timeout(self.timeout.min(Duration::from_secs(5)))
            .timeout(self.timeout)
            .build()
            .map_err(|e| ArbiterError::Http(Box::new(e)))?;

        let response = client
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ArbiterError::Http(Box::new(e)))?
            .error_for_status()
            .map_err(|e| ArbiterError::Http(Box::new(e)))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ArbiterError::Http(Box::new(e)))?;

        parse_verdicts(&body.response)
    }
}

/// Parse the model's raw answer into verdicts.
///
/// Tolerates markdown code fences around the JSON; anything else that
/// fails to parse is a malformed response, which the pipeline turns
/// into a rejected batch.
fn parse_verdicts(raw: &str) -> ArbiterResult<Vec<SpanVerdict>> {
    let trimmed = strip_code_fences(raw.trim());
    if trimmed.is_empty() {
        return Err(ArbiterError::EmptyResponse);
    }

    let envelope: VerdictEnvelope = serde_json::from_str(trimmed)
        .map_err(|e| ArbiterError::MalformedResponse(e.to_string()))?;
    Ok(envelope.verdicts)
}

fn strip_code_fences(raw: &str) -> &str {
    let raw = raw
        .strip_prefix("```json")
        .or_else(|| raw.strip_prefix("```"))
        .unwrap_or(raw);
    raw.strip_suffix("```").unwrap_or(raw).trim()
}
