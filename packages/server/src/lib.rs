//! HTTP shell for the PII detection pipeline.
//!
//! Owns routing, CORS, input validation, and configuration; all
//! detection logic lives in the `detection` library.

pub mod app;
pub mod config;
pub mod routes;

pub use app::{build_app, build_pipeline};
pub use config::Config;
