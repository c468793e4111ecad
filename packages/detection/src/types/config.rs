//! Configuration for the detection pipeline.

use std::time::Duration;

use crate::error::ConfigError;

/// Immutable configuration threaded into the pipeline constructor.
///
/// Thresholds partition detector confidence into three buckets:
/// `score >= accept_threshold` is accepted outright,
/// `review_threshold <= score < accept_threshold` goes to the fallback
/// arbiter, and anything below `review_threshold` is discarded.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Deterministic-accept threshold. Default: 0.85.
    pub accept_threshold: f32,

    /// Uncertain floor. Default: 0.6.
    pub review_threshold: f32,

    /// Hard deadline for a fallback arbitration call. Default: 15 s.
    pub fallback_timeout: Duration,

    /// Maximum accepted input length in bytes. Default: 5000.
    pub max_text_len: usize,

    /// Bytes of surrounding context handed to the arbiter per candidate.
    /// Default: 60.
    pub context_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.85,
            review_threshold: 0.6,
            fallback_timeout: Duration::from_secs(15),
            max_text_len: 5000,
            context_window: 60,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deterministic-accept threshold.
    pub fn with_accept_threshold(mut self, threshold: f32) -> Self {
        self.accept_threshold = threshold;
        self
    }

    /// Set the uncertain floor.
    pub fn with_review_threshold(mut self, threshold: f32) -> Self {
        self.review_threshold = threshold;
        self
    }

    /// Set the fallback call deadline.
    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = timeout;
        self
    }

    /// Set the maximum input length.
    pub fn with_max_text_len(mut self, max: usize) -> Self {
        self.max_text_len = max;
        self
    }

    /// Check the invariants: `0 <= review <= accept <= 1`, nonzero
    /// length limit, nonzero timeout. Violations are fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = (0.0..=1.0).contains(&self.review_threshold)
            && (0.0..=1.0).contains(&self.accept_threshold)
            && self.review_threshold <= self.accept_threshold;
        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                accept: self.accept_threshold,
                review: self.review_threshold,
            });
        }
        if self.max_text_len == 0 {
            return Err(ConfigError::ZeroMaxTextLen);
        }
        if self.fallback_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = PipelineConfig::new()
            .with_accept_threshold(0.5)
            .with_review_threshold(0.8);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_out_of_range_thresholds_rejected() {
        let config = PipelineConfig::new().with_accept_threshold(1.2);
        assert!(config.validate().is_err());

        let config = PipelineConfig::new().with_review_threshold(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_equal_thresholds_allowed() {
        let config = PipelineConfig::new()
            .with_accept_threshold(0.7)
            .with_review_threshold(0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(PipelineConfig::new().with_max_text_len(0).validate().is_err());
        assert!(PipelineConfig::new()
            .with_fallback_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
