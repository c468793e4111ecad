//! The detection pipeline: classification, reconciliation, fallback
//! arbitration, redaction, and the orchestrator tying them together.

pub mod analyze;
pub mod classify;
pub mod fallback;
pub mod reconcile;
pub mod redact;

pub use analyze::Pipeline;
pub use classify::{classify, Bucket, ClassifiedSpan};
pub use fallback::resolve_uncertain;
pub use reconcile::reconcile;
pub use redact::{placeholder, redact};
