//! Core trait abstractions for the detection library.
//!
//! These traits define the seams between the pipeline and the engines
//! it orchestrates: detection engines and the LLM fallback arbiter.

pub mod arbiter;
pub mod detector;
