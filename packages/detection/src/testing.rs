//! Testing utilities including mock implementations.
//!
//! These are useful for testing pipeline logic without real detection
//! engines or LLM calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ArbiterError, ArbiterResult, DetectError, DetectResult};
use crate::traits::arbiter::{Arbiter, ReviewCandidate, SpanVerdict};
use crate::traits::detector::Detector;
use crate::types::span::{PiiSpan, SpanSource};

/// A mock detector returning scripted spans, or failing on demand.
#[derive(Default)]
pub struct MockDetector {
    name: String,
    spans: Vec<PiiSpan>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockDetector {
    /// Create a mock named `name` that returns no spans.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Script the spans this detector reports for every call.
    pub fn with_spans(mut self, spans: Vec<PiiSpan>) -> Self {
        self.spans = spans;
        self
    }

    /// Make every `detect` call fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Handle to the call counter, usable after the mock moves into a
    /// pipeline.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Detector for MockDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn detect(&self, _text: &str) -> DetectResult<Vec<PiiSpan>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DetectError::Engine("scripted failure".into()));
        }
        Ok(self.spans.clone())
    }
}

/// A mock arbiter with scripted verdicts, optional delay (for timeout
/// tests), optional failure, and call tracking.
#[derive(Default)]
pub struct MockArbiter {
    verdicts: Vec<SpanVerdict>,
    delay: Option<Duration>,
    fail: bool,
    calls: Arc<AtomicUsize>,
    seen: Arc<RwLock<Vec<Vec<ReviewCandidate>>>>,
}

impl MockArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the verdicts returned by every `review` call.
    pub fn with_verdicts(mut self, verdicts: Vec<SpanVerdict>) -> Self {
        self.verdicts = verdicts;
        self
    }

    /// Sleep before answering, to exercise the pipeline deadline.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every `review` call fail.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of `review` calls made so far.
    pub fn review_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Handle to the call counter, usable after the mock moves into a
    /// pipeline.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Candidate batches passed to `review`, for assertions.
    pub fn seen_batches(&self) -> Vec<Vec<ReviewCandidate>> {
        self.seen.read().unwrap().clone()
    }
}

#[async_trait]
impl Arbiter for MockArbiter {
    async fn review(
        &self,
        _text: &str,
        candidates: &[ReviewCandidate],
    ) -> ArbiterResult<Vec<SpanVerdict>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.write().unwrap().push(candidates.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ArbiterError::MalformedResponse(
                "scripted failure".to_string(),
            ));
        }
        Ok(self.verdicts.clone())
    }
}

/// Shorthand for building a validated span in tests.
pub fn span_in(
    text: &str,
    snippet: &str,
    entity_type: &str,
    score: f32,
    source: SpanSource,
) -> PiiSpan {
    let start = text
        .find(snippet)
        .unwrap_or_else(|| panic!("snippet {snippet:?} not in text"));
    PiiSpan::new(entity_type, start, start + snippet.len(), score, source, text)
        .expect("valid test span")
}
