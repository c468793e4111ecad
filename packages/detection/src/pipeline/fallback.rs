//! Fallback invocation: resolve uncertain spans through the LLM
//! arbiter under a hard deadline, failing closed on any trouble.

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::traits::arbiter::{Arbiter, ReviewCandidate, SpanVerdict};
use crate::types::config::PipelineConfig;
use crate::types::span::{PiiSpan, SpanSource};

/// Send the uncertain batch to the arbiter and return the confirmed
/// spans, promoted into the accepted bucket.
///
/// Degradation is all-or-nothing and fail-closed: on timeout, transport
/// failure, or a malformed answer the whole batch is treated as
/// rejected. The failure is logged, never surfaced to the caller.
pub async fn resolve_uncertain<A: Arbiter + ?Sized>(
    arbiter: &A,
    text: &str,
    uncertain: &[PiiSpan],
    config: &PipelineConfig,
) -> Vec<PiiSpan> {
    if uncertain.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<ReviewCandidate> = uncertain
        .iter()
        .enumerate()
        .map(|(i, span)| ReviewCandidate::from_span(i, span, text, config.context_window))
        .collect();

    let verdicts = match timeout(config.fallback_timeout, arbiter.review(text, &candidates)).await
    {
        Ok(Ok(verdicts)) => verdicts,
        Ok(Err(error)) => {
            warn!(error = %error, batch = uncertain.len(), "Fallback arbiter failed; rejecting uncertain batch");
            return Vec::new();
        }
        Err(_) => {
            warn!(
                timeout_ms = config.fallback_timeout.as_millis() as u64,
                batch = uncertain.len(),
                "Fallback arbiter timed out; rejecting uncertain batch"
            );
            return Vec::new();
        }
    };

    let mut confirmed = Vec::new();
    for verdict in verdicts {
        let Some(original) = uncertain.get(verdict.index) else {
            debug!(index = verdict.index, "Verdict references unknown candidate; ignored");
            continue;
        };
        if let Some(span) = apply_verdict(original, &verdict, text, config) {
            confirmed.push(span);
        }
    }
    confirmed
}

/// Turn one verdict into a promoted span, or `None` when the verdict
/// amounts to a rejection (unconfirmed, low confidence, or offsets
/// that no longer map into the text).
fn apply_verdict(
    original: &PiiSpan,
    verdict: &SpanVerdict,
    text: &str,
    config: &PipelineConfig,
) -> Option<PiiSpan> {
    if !verdict.confirmed {
        return None;
    }
    // A confidence the model reports below the uncertain floor is a
    // rejection, not an error.
    if verdict.score < config.review_threshold {
        debug!(
            index = verdict.index,
            score = verdict.score,
            "Arbiter confidence below review floor; span rejected"
        );
        return None;
    }

    let entity_type = verdict
        .entity_type
        .clone()
        .unwrap_or_else(|| original.entity_type.clone());
    let start = verdict.start.unwrap_or(original.start);
    let end = verdict.end.unwrap_or(original.end);

    // Clamped into the accepted bucket so the span survives the final
    // reconciliation pass alongside originally-accepted spans.
    let score = config.accept_threshold.max(original.score).min(1.0);

    match PiiSpan::new(entity_type, start, end, score, SpanSource::Fallback, text) {
        Ok(span) => Some(span),
        Err(error) => {
            debug!(index = verdict.index, error = %error, "Arbiter offsets invalid; span rejected");
            None
        }
    }
}
