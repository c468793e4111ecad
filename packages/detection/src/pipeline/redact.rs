//! Redaction: rewrite the input replacing accepted spans with stable
//! typed placeholders.

use crate::types::span::PiiSpan;

/// Placeholder token for an entity type.
///
/// A pure function of the type only; identical types always yield
/// identical placeholders, which makes redaction reproducible from the
/// input and the entity list alone.
pub fn placeholder(entity_type: &str) -> String {
    format!("[REDACTED_{entity_type}]")
}

/// Replace each span with its placeholder.
///
/// `spans` must be non-overlapping and sorted ascending by start (the
/// reconciler's output). Replacement walks in descending start order so
/// earlier offsets stay valid; bytes outside the spans are untouched.
pub fn redact(text: &str, spans: &[PiiSpan]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    let mut result = text.to_string();
    for span in spans.iter().rev() {
        result.replace_range(span.start..span.end, &placeholder(&span.entity_type));
    }
    result
}
