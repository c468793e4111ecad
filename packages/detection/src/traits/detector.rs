//! Detector trait: the uniform capability over heterogeneous engines.

use async_trait::async_trait;

use crate::error::DetectResult;
use crate::types::span::PiiSpan;

/// A detection engine producing candidate spans for a text.
///
/// Implementations wrap specific engines (regex/checksum recognizers,
/// a statistical NER model) and must be deterministic for identical
/// input and engine state. The pipeline registers any number of
/// detectors and invokes them concurrently; a failing detector
/// degrades recall but never fails the request.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Stable engine name, used in logs.
    fn name(&self) -> &str;

    /// Scan `text` and return candidate spans.
    ///
    /// Returned offsets must be byte offsets into `text`; the pipeline
    /// re-validates every span and drops offenders individually.
    async fn detect(&self, text: &str) -> DetectResult<Vec<PiiSpan>>;
}
