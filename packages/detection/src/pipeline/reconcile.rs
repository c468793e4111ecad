//! Span reconciliation: merge overlapping and duplicate spans from
//! multiple detectors into one non-overlapping, offset-ordered list.

use std::cmp::Ordering;

use crate::pipeline::classify::ClassifiedSpan;

/// Merge candidate spans into a non-overlapping, start-ordered list.
///
/// Ordering: start ascending, then length descending (prefer the longer
/// annotation on ties), then score descending, then source priority
/// (statistical > pattern > fallback). The sweep keeps a candidate when
/// it does not overlap the last kept span; an overlapping candidate
/// that strictly contains the last kept span with equal or higher score
/// replaces it, so a larger confident annotation wins over a smaller
/// nested one.
pub fn reconcile(mut spans: Vec<ClassifiedSpan>) -> Vec<ClassifiedSpan> {
    spans.sort_by(compare);

    let mut kept: Vec<ClassifiedSpan> = Vec::with_capacity(spans.len());
    for candidate in spans {
        if let Some(last) = kept.last_mut() {
            if candidate.span.overlaps(&last.span) {
                if candidate.span.strictly_contains(&last.span)
                    && candidate.span.score >= last.span.score
                {
                    *last = candidate;
                }
                // otherwise dropped: the earlier-sorted span wins
                continue;
            }
        }
        kept.push(candidate);
    }
    kept
}

fn compare(a: &ClassifiedSpan, b: &ClassifiedSpan) -> Ordering {
    a.span
        .start
        .cmp(&b.span.start)
        .then_with(|| b.span.len().cmp(&a.span.len()))
        .then_with(|| b.span.score.total_cmp(&a.span.score))
        .then_with(|| a.span.source.priority().cmp(&b.span.source.priority()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::Bucket;
    use crate::types::config::PipelineConfig;
    use crate::types::span::{PiiSpan, SpanSource};

    fn span(
        text: &str,
        start: usize,
        end: usize,
        score: f32,
        source: SpanSource,
    ) -> ClassifiedSpan {
        let span = PiiSpan::new("ENTITY", start, end, score, source, text).unwrap();
        ClassifiedSpan::new(span, &PipelineConfig::default())
    }

    const TEXT: &str = "John Smith lives at 123 Main Street in Springfield";

    #[test]
    fn test_disjoint_spans_all_kept_in_order() {
        let result = reconcile(vec![
            span(TEXT, 20, 35, 0.9, SpanSource::Pattern),
            span(TEXT, 0, 10, 0.9, SpanSource::Statistical),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].span.start, 0);
        assert_eq!(result[1].span.start, 20);
    }

    #[test]
    fn test_nested_span_dropped_for_larger_equal_score() {
        // PERSON over a nested initial: keep only the larger one
        let result = reconcile(vec![
            span(TEXT, 0, 4, 0.8, SpanSource::Statistical),
            span(TEXT, 0, 10, 0.8, SpanSource::Statistical),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!((result[0].span.start, result[0].span.end), (0, 10));
    }

    #[test]
    fn test_nested_span_dropped_even_when_inner_scores_higher() {
        // Longer-first ordering on same start means the outer span is
        // kept and the higher-scoring nested one cannot replace it
        // (replacement requires strict containment).
        let result = reconcile(vec![
            span(TEXT, 0, 4, 0.95, SpanSource::Pattern),
            span(TEXT, 0, 10, 0.8, SpanSource::Statistical),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].span.end, 10);
    }

    #[test]
    fn test_partial_overlap_keeps_first_sorted() {
        let result = reconcile(vec![
            span(TEXT, 5, 15, 0.9, SpanSource::Pattern),
            span(TEXT, 0, 10, 0.7, SpanSource::Pattern),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].span.start, 0);
    }

    #[test]
    fn test_tie_broken_by_source_priority() {
        // Identical offsets and score: statistical beats pattern beats fallback
        let result = reconcile(vec![
            span(TEXT, 0, 10, 0.9, SpanSource::Fallback),
            span(TEXT, 0, 10, 0.9, SpanSource::Pattern),
            span(TEXT, 0, 10, 0.9, SpanSource::Statistical),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].span.source, SpanSource::Statistical);
    }

    #[test]
    fn test_same_start_prefers_longer_over_higher_score() {
        let result = reconcile(vec![
            span(TEXT, 20, 27, 0.99, SpanSource::Pattern),
            span(TEXT, 20, 35, 0.85, SpanSource::Pattern),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].span.end, 35);
    }

    #[test]
    fn test_bucket_tags_preserved() {
        let config = PipelineConfig::default();
        let uncertain =
            PiiSpan::new("PERSON", 0, 10, 0.7, SpanSource::Statistical, TEXT).unwrap();
        let accepted =
            PiiSpan::new("ADDRESS", 20, 35, 0.9, SpanSource::Pattern, TEXT).unwrap();
        let result = reconcile(vec![
            ClassifiedSpan::new(uncertain, &config),
            ClassifiedSpan::new(accepted, &config),
        ]);
        assert_eq!(result[0].bucket, Bucket::Uncertain);
        assert_eq!(result[1].bucket, Bucket::Accepted);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// For arbitrary candidate sets the output is pairwise
            /// non-overlapping and sorted ascending by start.
            #[test]
            fn reconciled_spans_never_overlap(
                raw in proptest::collection::vec((0usize..50, 1usize..12, 0u8..=100), 0..20)
            ) {
                let text = "x".repeat(64);
                let spans: Vec<ClassifiedSpan> = raw
                    .into_iter()
                    .map(|(start, len, score)| {
                        let end = (start + len).min(text.len());
                        span(&text, start, end, score as f32 / 100.0, SpanSource::Pattern)
                    })
                    .collect();

                let result = reconcile(spans);
                for pair in result.windows(2) {
                    prop_assert!(pair[0].span.end <= pair[1].span.start);
                }
            }
        }
    }
}
