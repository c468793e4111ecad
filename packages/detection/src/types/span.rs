//! Span types: a detected candidate PII occurrence.

use serde::{Deserialize, Serialize};

use crate::error::SpanError;

/// Which engine produced a span.
///
/// Used for reconciliation tie-breaking and observability; never
/// serialized to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanSource {
    /// Statistical NER model
    Statistical,
    /// Regex / checksum recognizer
    Pattern,
    /// LLM fallback arbitration
    Fallback,
}

impl SpanSource {
    /// Tie-break priority: lower wins.
    ///
    /// Fallback spans are only trusted when nothing else claimed the
    /// region, so they rank last.
    pub fn priority(self) -> u8 {
        match self {
            SpanSource::Statistical => 0,
            SpanSource::Pattern => 1,
            SpanSource::Fallback => 2,
        }
    }
}

impl Default for SpanSource {
    fn default() -> Self {
        SpanSource::Pattern
    }
}

/// A detected candidate PII occurrence.
///
/// Offsets are half-open byte offsets into the original UTF-8 input;
/// `text` is always the substring `input[start..end]`, guaranteed by
/// construction via [`PiiSpan::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiSpan {
    /// Entity category label (open enumeration: PERSON, EMAIL_ADDRESS, ...)
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Confidence score in [0.0, 1.0]
    pub score: f32,

    /// Start byte offset (inclusive)
    pub start: usize,

    /// End byte offset (exclusive)
    pub end: usize,

    /// The matched substring, denormalized for cheap comparison and audit
    pub text: String,

    /// Producing engine; internal, not part of the wire contract
    #[serde(skip)]
    pub source: SpanSource,
}

impl PiiSpan {
    /// Build a span over `source_text`, validating every invariant.
    ///
    /// The snippet is sliced from the source, so `text == input[start..end]`
    /// holds for every constructed span.
    pub fn new(
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        score: f32,
        source: SpanSource,
        source_text: &str,
    ) -> Result<Self, SpanError> {
        if start >= end || end > source_text.len() {
            return Err(SpanError::InvalidOffsets {
                start,
                end,
                len: source_text.len(),
            });
        }
        if !source_text.is_char_boundary(start) || !source_text.is_char_boundary(end) {
            return Err(SpanError::NotCharBoundary { start, end });
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(SpanError::ScoreOutOfRange(score));
        }

        Ok(Self {
            entity_type: entity_type.into(),
            score,
            start,
            end,
            text: source_text[start..end].to_string(),
            source,
        })
    }

    /// Re-validate a span reported by an external engine against the
    /// original text, including the snippet it claims to have matched.
    pub fn validate_against(&self, source_text: &str) -> Result<(), SpanError> {
        if self.start >= self.end || self.end > source_text.len() {
            return Err(SpanError::InvalidOffsets {
                start: self.start,
                end: self.end,
                len: source_text.len(),
            });
        }
        if !source_text.is_char_boundary(self.start) || !source_text.is_char_boundary(self.end) {
            return Err(SpanError::NotCharBoundary {
                start: self.start,
                end: self.end,
            });
        }
        let expected = &source_text[self.start..self.end];
        if expected != self.text {
            return Err(SpanError::TextMismatch {
                expected: expected.to_string(),
                reported: self.text.clone(),
            });
        }
        Ok(())
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this span overlaps another.
    pub fn overlaps(&self, other: &PiiSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether this span strictly contains another (covers it and is longer).
    pub fn strictly_contains(&self, other: &PiiSpan) -> bool {
        self.start <= other.start && self.end >= other.end && self.len() > other.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slices_text_from_source() {
        let text = "email me at a@b.com please";
        let span = PiiSpan::new("EMAIL_ADDRESS", 12, 19, 0.99, SpanSource::Pattern, text).unwrap();
        assert_eq!(span.text, "a@b.com");
        assert!(span.validate_against(text).is_ok());
    }

    #[test]
    fn test_new_rejects_inverted_offsets() {
        let err = PiiSpan::new("X", 5, 5, 0.5, SpanSource::Pattern, "hello world");
        assert!(matches!(err, Err(SpanError::InvalidOffsets { .. })));

        let err = PiiSpan::new("X", 7, 3, 0.5, SpanSource::Pattern, "hello world");
        assert!(matches!(err, Err(SpanError::InvalidOffsets { .. })));
    }

    #[test]
    fn test_new_rejects_out_of_bounds() {
        let err = PiiSpan::new("X", 0, 100, 0.5, SpanSource::Pattern, "short");
        assert!(matches!(err, Err(SpanError::InvalidOffsets { .. })));
    }

    #[test]
    fn test_new_rejects_non_char_boundary() {
        // 'é' is two bytes; offset 1 splits it
        let err = PiiSpan::new("X", 1, 2, 0.5, SpanSource::Pattern, "émail");
        assert!(matches!(err, Err(SpanError::NotCharBoundary { .. })));
    }

    #[test]
    fn test_new_rejects_bad_score() {
        let err = PiiSpan::new("X", 0, 3, 1.5, SpanSource::Pattern, "abc");
        assert!(matches!(err, Err(SpanError::ScoreOutOfRange(_))));
    }

    #[test]
    fn test_validate_against_catches_text_mismatch() {
        let text = "call 555-1234 now";
        let mut span = PiiSpan::new("PHONE_NUMBER", 5, 13, 0.9, SpanSource::Pattern, text).unwrap();
        span.text = "555-9999".to_string();
        assert!(matches!(
            span.validate_against(text),
            Err(SpanError::TextMismatch { .. })
        ));
    }

    #[test]
    fn test_overlap_and_containment() {
        let text = "John Smith spoke";
        let outer = PiiSpan::new("PERSON", 0, 10, 0.8, SpanSource::Statistical, text).unwrap();
        let inner = PiiSpan::new("PERSON", 0, 4, 0.8, SpanSource::Pattern, text).unwrap();
        let after = PiiSpan::new("X", 11, 16, 0.8, SpanSource::Pattern, text).unwrap();

        assert!(outer.overlaps(&inner));
        assert!(outer.strictly_contains(&inner));
        assert!(!inner.strictly_contains(&outer));
        assert!(!outer.overlaps(&after));
    }

    #[test]
    fn test_source_not_serialized() {
        let text = "a@b.com";
        let span = PiiSpan::new("EMAIL_ADDRESS", 0, 7, 0.99, SpanSource::Statistical, text).unwrap();
        let json = serde_json::to_value(&span).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["type"], "EMAIL_ADDRESS");
    }

    #[test]
    fn test_deserialized_span_defaults_to_pattern_source() {
        // `source` is skipped on the wire, so incoming spans pick up
        // the default source.
        let json = r#"{"type": "EMAIL_ADDRESS", "score": 0.99, "start": 0, "end": 7, "text": "a@b.com"}"#;
        let span: PiiSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.source, SpanSource::Pattern);
    }

    #[test]
    fn test_priority_order() {
        assert!(SpanSource::Statistical.priority() < SpanSource::Pattern.priority());
        assert!(SpanSource::Pattern.priority() < SpanSource::Fallback.priority());
    }
}
