//! Arbiter implementations.

pub mod ollama;

pub use ollama::OllamaArbiter;
