//! Arbiter trait: LLM-backed review of uncertain spans.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ArbiterResult;
use crate::types::span::PiiSpan;

/// One uncertain span handed to the arbiter for review.
///
/// Carries bounded surrounding context rather than relying on the model
/// to re-locate the span in the full document.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCandidate {
    /// Position of this candidate within the batch; verdicts refer back
    /// to it
    pub index: usize,

    /// Candidate entity type as reported by the original detector
    pub entity_type: String,

    /// Byte offsets into the original text
    pub start: usize,
    pub end: usize,

    /// The candidate snippet
    pub text: String,

    /// Original detector confidence
    pub score: f32,

    /// Surrounding text, clamped to char boundaries
    pub context: String,
}

impl ReviewCandidate {
    /// Build a candidate from an uncertain span, extracting up to
    /// `window` bytes of context on each side.
    pub fn from_span(index: usize, span: &PiiSpan, text: &str, window: usize) -> Self {
        let mut ctx_start = span.start.saturating_sub(window);
        while ctx_start > 0 && !text.is_char_boundary(ctx_start) {
            ctx_start -= 1;
        }
        let mut ctx_end = (span.end + window).min(text.len());
        while ctx_end < text.len() && !text.is_char_boundary(ctx_end) {
            ctx_end += 1;
        }

        Self {
            index,
            entity_type: span.entity_type.clone(),
            start: span.start,
            end: span.end,
            text: span.text.clone(),
            score: span.score,
            context: text[ctx_start..ctx_end].to_string(),
        }
    }
}

/// The arbiter's judgement on one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanVerdict {
    /// Which candidate this verdict answers
    pub index: usize,

    /// Whether the model confirmed the span as PII
    pub confirmed: bool,

    /// Re-typed entity category, if the model disagreed with the
    /// candidate type
    #[serde(default)]
    pub entity_type: Option<String>,

    /// Adjusted offsets, if the model narrowed or widened the span.
    /// Offsets that do not map back into the original text reject the
    /// span, they are never an error.
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,

    /// Model-reported confidence
    pub score: f32,
}

/// Capability to arbitrate uncertain spans with a local LLM.
///
/// Implementations own the transport (endpoint, model id) and the
/// prompt/response protocol; the pipeline owns the deadline and the
/// fail-closed degradation.
#[async_trait]
pub trait Arbiter: Send + Sync {
    /// Ask the model to confirm, reject, or re-type each candidate.
    async fn review(
        &self,
        text: &str,
        candidates: &[ReviewCandidate],
    ) -> ArbiterResult<Vec<SpanVerdict>>;
}
