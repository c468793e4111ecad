//! Confidence-Gated PII Detection and Redaction
//!
//! A library that detects personally identifiable information in free
//! text and produces a redacted version of it, combining deterministic
//! pattern/checksum recognizers, a statistical named-entity recognizer,
//! and an optional local-LLM fallback for low-confidence spans.
//!
//! # Design Philosophy
//!
//! **Deterministic where confident, arbitrated where not, fail-closed
//! everywhere.**
//!
//! - Detectors are capabilities behind one trait; engines are added by
//!   registration, not by branching logic
//! - Two thresholds partition every span into accept / uncertain /
//!   reject; only the uncertain band ever reaches the LLM
//! - The fallback runs under a hard deadline and degrades to rejection
//!   on any failure; accepted spans are never blocked by it
//! - Nothing about a request outlives the request: no caching, no
//!   persistence of text or spans
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use detection::{OllamaArbiter, PatternDetector, Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(OllamaArbiter::default(), PipelineConfig::default())?
//!     .with_detector(Arc::new(PatternDetector::new()));
//!
//! let report = pipeline.analyze("My email is john.doe@example.com").await?;
//! assert!(report.has_pii);
//! assert_eq!(report.redacted_text, "My email is [REDACTED_EMAIL_ADDRESS]");
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Detector, Arbiter)
//! - [`types`] - Spans, configuration, and the analysis report
//! - [`pipeline`] - Classification, reconciliation, fallback, redaction
//! - [`detectors`] - Pattern recognizer and remote NER adapter
//! - [`arbiters`] - Ollama fallback arbiter
//! - [`view`] - Display view of an analysis (labels, excerpts, stats)
//! - [`testing`] - Mock implementations for testing

pub mod arbiters;
pub mod detectors;
pub mod error;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;
pub mod view;

// Re-export core types at crate root
pub use error::{
    ArbiterError, ArbiterResult, ConfigError, DetectError, DetectResult, PipelineError,
    PipelineResult, SpanError,
};
pub use traits::{
    arbiter::{Arbiter, ReviewCandidate, SpanVerdict},
    detector::Detector,
};
pub use types::{
    config::PipelineConfig,
    report::AnalysisReport,
    span::{PiiSpan, SpanSource},
};

// Re-export pipeline components
pub use pipeline::{classify, placeholder, reconcile, redact, Bucket, ClassifiedSpan, Pipeline};

// Re-export implementations
pub use arbiters::OllamaArbiter;
pub use detectors::{PatternDetector, RemoteNerDetector};

// Re-export the display view builder
pub use view::{build_view, Finding, ReportView, ViewStats};
