//! The final result of one analysis request.

use serde::{Deserialize, Serialize};

use crate::types::span::PiiSpan;

/// Result of a detection-and-redaction run.
///
/// `entities` contains only accepted spans, pairwise non-overlapping
/// and sorted ascending by `start`; `redacted_text` is fully
/// reproducible from the input and `entities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Accepted spans in ascending start order
    pub entities: Vec<PiiSpan>,

    /// Whether any PII was detected (`entities` non-empty)
    pub has_pii: bool,

    /// The input with each accepted span replaced by its placeholder
    pub redacted_text: String,
}

impl AnalysisReport {
    /// Build a report; `has_pii` is derived, never stored independently.
    pub fn new(entities: Vec<PiiSpan>, redacted_text: String) -> Self {
        Self {
            has_pii: !entities.is_empty(),
            entities,
            redacted_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::span::SpanSource;

    #[test]
    fn test_has_pii_derived_from_entities() {
        let clean = AnalysisReport::new(vec![], "nothing here".to_string());
        assert!(!clean.has_pii);

        let text = "a@b.com";
        let span = PiiSpan::new("EMAIL_ADDRESS", 0, 7, 0.99, SpanSource::Pattern, text).unwrap();
        let found = AnalysisReport::new(vec![span], "[REDACTED_EMAIL_ADDRESS]".to_string());
        assert!(found.has_pii);
    }
}
