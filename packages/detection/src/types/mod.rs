//! Data types for the detection pipeline.

pub mod config;
pub mod report;
pub mod span;
