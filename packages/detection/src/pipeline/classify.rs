//! Confidence classification: the decision boundary between acting
//! deterministically and asking the fallback arbiter.

use crate::types::config::PipelineConfig;
use crate::types::span::PiiSpan;

/// Where a span lands relative to the two configured thresholds.
///
/// Derived, never stored: always a pure function of score and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// `score >= accept_threshold`: trusted without arbitration
    Accepted,
    /// `review_threshold <= score < accept_threshold`: needs the arbiter
    Uncertain,
    /// `score < review_threshold`: discarded immediately
    Rejected,
}

/// Classify a confidence score against the configured thresholds.
pub fn classify(score: f32, config: &PipelineConfig) -> Bucket {
    if score >= config.accept_threshold {
        Bucket::Accepted
    } else if score >= config.review_threshold {
        Bucket::Uncertain
    } else {
        Bucket::Rejected
    }
}

/// A span tagged with its classification, flowing between the
/// classifier, the reconciler, and the fallback step.
#[derive(Debug, Clone)]
pub struct ClassifiedSpan {
    pub span: PiiSpan,
    pub bucket: Bucket,
}

impl ClassifiedSpan {
    pub fn new(span: PiiSpan, config: &PipelineConfig) -> Self {
        let bucket = classify(span.score, config);
        Self { span, bucket }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default() // accept 0.85, review 0.6
    }

    #[test]
    fn test_score_at_accept_threshold_is_accepted() {
        assert_eq!(classify(0.85, &config()), Bucket::Accepted);
        assert_eq!(classify(1.0, &config()), Bucket::Accepted);
    }

    #[test]
    fn test_score_just_below_accept_is_uncertain() {
        assert_eq!(classify(0.8499, &config()), Bucket::Uncertain);
        assert_eq!(classify(0.6, &config()), Bucket::Uncertain);
    }

    #[test]
    fn test_score_below_review_floor_is_rejected() {
        assert_eq!(classify(0.5999, &config()), Bucket::Rejected);
        assert_eq!(classify(0.0, &config()), Bucket::Rejected);
    }

    #[test]
    fn test_equal_thresholds_leave_no_uncertain_band() {
        let config = PipelineConfig::new()
            .with_accept_threshold(0.7)
            .with_review_threshold(0.7);
        assert_eq!(classify(0.7, &config), Bucket::Accepted);
        assert_eq!(classify(0.69, &config), Bucket::Rejected);
    }
}
