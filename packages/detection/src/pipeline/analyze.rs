//! The Pipeline - main entry point for the detection library.
//!
//! Sequences one request through detection, classification, fallback
//! arbitration, reconciliation, and redaction. Detection-quality
//! degradation (a failing detector, a slow or broken fallback) never
//! fails a request; only input validation does.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::pipeline::classify::{Bucket, ClassifiedSpan};
use crate::pipeline::fallback::resolve_uncertain;
use crate::pipeline::reconcile::reconcile;
use crate::pipeline::redact::redact;
use crate::traits::arbiter::Arbiter;
use crate::traits::detector::Detector;
use crate::types::config::PipelineConfig;
use crate::types::report::AnalysisReport;
use crate::types::span::PiiSpan;

/// Request processing stages, traced in order for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    Detecting,
    Classifying,
    FallbackPending,
    Reconciling,
    Redacting,
    Completed,
}

/// The detection-and-redaction pipeline.
///
/// Detectors are added by registration, not by branching logic; the
/// pipeline is agnostic to how many or which engines are present.
///
/// # Example
///
/// ```rust,ignore
/// use detection::{Pipeline, PipelineConfig, PatternDetector, OllamaArbiter};
///
/// let pipeline = Pipeline::new(OllamaArbiter::default(), PipelineConfig::default())?
///     .with_detector(Arc::new(PatternDetector::new()));
/// let report = pipeline.analyze("My email is a@b.com").await?;
/// ```
pub struct Pipeline<A: Arbiter> {
    detectors: Vec<Arc<dyn Detector>>,
    arbiter: A,
    config: PipelineConfig,
}

impl<A: Arbiter> Pipeline<A> {
    /// Create a pipeline with a validated configuration.
    ///
    /// An invalid configuration (inverted thresholds, zero limits) is a
    /// fatal startup error, never discovered mid-request.
    pub fn new(arbiter: A, config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            detectors: Vec::new(),
            arbiter,
            config,
        })
    }

    /// Register a detection engine.
    pub fn with_detector(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one request through the full pipeline.
    ///
    /// Always returns a best-effort report unless the input itself is
    /// invalid; every stage runs even when it has nothing to do.
    pub async fn analyze(&self, text: &str) -> PipelineResult<AnalysisReport> {
        self.enter(Stage::Received, text.len());
        if text.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        if text.len() > self.config.max_text_len {
            return Err(PipelineError::InputTooLong {
                len: text.len(),
                max: self.config.max_text_len,
            });
        }

        self.enter(Stage::Detecting, text.len());
        let raw = self.run_detectors(text).await;

        self.enter(Stage::Classifying, raw.len());
        let mut classified: Vec<ClassifiedSpan> = raw
            .into_iter()
            .map(|span| ClassifiedSpan::new(span, &self.config))
            .filter(|c| c.bucket != Bucket::Rejected)
            .collect();
        // First reconciliation pass over accepted and uncertain spans
        // together, so the arbiter only ever sees regions no detector
        // confidently claimed.
        classified = reconcile(classified);

        let (accepted, uncertain): (Vec<_>, Vec<_>) = classified
            .into_iter()
            .partition(|c| c.bucket == Bucket::Accepted);
        let mut accepted: Vec<PiiSpan> = accepted.into_iter().map(|c| c.span).collect();
        let uncertain: Vec<PiiSpan> = uncertain.into_iter().map(|c| c.span).collect();

        self.enter(Stage::FallbackPending, uncertain.len());
        let confirmed =
            resolve_uncertain(&self.arbiter, text, &uncertain, &self.config).await;

        self.enter(Stage::Reconciling, accepted.len() + confirmed.len());
        // Confirmed fallback spans re-enter reconciliation alongside the
        // originally accepted ones: their final offsets may newly
        // overlap spans from other detectors.
        accepted.extend(confirmed);
        let finalists: Vec<PiiSpan> = reconcile(
            accepted
                .into_iter()
                .map(|span| ClassifiedSpan {
                    span,
                    bucket: Bucket::Accepted,
                })
                .collect(),
        )
        .into_iter()
        .map(|c| c.span)
        .collect();

        self.enter(Stage::Redacting, finalists.len());
        let redacted_text = redact(text, &finalists);

        self.enter(Stage::Completed, finalists.len());
        Ok(AnalysisReport::new(finalists, redacted_text))
    }

    /// Fan out to every registered detector concurrently, dropping
    /// failed engines and invalid spans without failing the request.
    async fn run_detectors(&self, text: &str) -> Vec<PiiSpan> {
        let futures = self.detectors.iter().map(|d| async move {
            let name = d.name().to_string();
            (name, d.detect(text).await)
        });
        let outcomes = join_all(futures).await;

        let mut spans = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(detected) => {
                    for span in detected {
                        // A single malformed span is dropped, not
                        // allowed to corrupt reconciliation ordering.
                        match span.validate_against(text) {
                            Ok(()) => spans.push(span),
                            Err(error) => {
                                warn!(detector = %name, error = %error, "Dropping invalid span");
                            }
                        }
                    }
                }
                Err(error) => {
                    // Loss of one signal degrades recall, not correctness.
                    warn!(detector = %name, error = %error, "Detector failed; continuing without it");
                }
            }
        }
        spans
    }

    fn enter(&self, stage: Stage, items: usize) {
        debug!(stage = ?stage, items, "Pipeline stage");
    }
}
