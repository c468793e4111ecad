//! Typed errors for the detection library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors raised when constructing or validating a span.
#[derive(Debug, Error)]
pub enum SpanError {
    /// Offsets are inverted or fall outside the source text
    #[error("invalid offsets {start}..{end} for text of length {len}")]
    InvalidOffsets {
        start: usize,
        end: usize,
        len: usize,
    },

    /// Offsets do not land on UTF-8 character boundaries
    #[error("offsets {start}..{end} are not on char boundaries")]
    NotCharBoundary { start: usize, end: usize },

    /// Reported snippet does not match the source substring
    #[error("span text {reported:?} does not match source {expected:?}")]
    TextMismatch { expected: String, reported: String },

    /// Confidence score outside [0, 1]
    #[error("score {0} outside [0.0, 1.0]")]
    ScoreOutOfRange(f32),
}

/// Errors raised while validating pipeline configuration.
///
/// These are fatal at startup: a pipeline is never built from an
/// invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Thresholds must satisfy 0 <= review <= accept <= 1
    #[error("invalid thresholds: review {review} must not exceed accept {accept}, both within [0, 1]")]
    InvalidThresholds { accept: f32, review: f32 },

    /// Maximum text length must be nonzero
    #[error("max_text_len must be nonzero")]
    ZeroMaxTextLen,

    /// Fallback timeout must be nonzero
    #[error("fallback_timeout must be nonzero")]
    ZeroTimeout,
}

/// Errors a detector engine may raise.
///
/// The pipeline recovers from all of these: a failing detector is
/// logged and skipped, never fatal to the request.
#[derive(Debug, Error)]
pub enum DetectError {
    /// HTTP transport failed (remote engines)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Engine returned a response that could not be interpreted
    #[error("malformed engine response: {0}")]
    MalformedResponse(String),

    /// Engine-specific failure
    #[error("detector engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors the fallback arbiter may raise.
///
/// The pipeline treats any of these as a degraded batch: every
/// Uncertain span falls back to Rejected (fail-closed).
#[derive(Debug, Error)]
pub enum ArbiterError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model produced an empty answer
    #[error("empty model response")]
    EmptyResponse,

    /// Model answer could not be parsed as structured verdicts
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// Errors surfaced by the pipeline itself.
///
/// Detection-quality degradation is never an error; only input
/// validation short-circuits a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input exceeds the configured maximum length
    #[error("input of {len} bytes exceeds maximum of {max}")]
    InputTooLong { len: usize, max: usize },

    /// Input is empty
    #[error("input text is empty")]
    EmptyInput,
}

/// Result type alias for detector operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Result type alias for arbiter operations.
pub type ArbiterResult<T> = std::result::Result<T, ArbiterError>;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
