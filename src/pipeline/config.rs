//! Pipeline configuration and its validation rules.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

/// Default maximum number of fetches in flight.
pub const DEFAULT_MAX_DOWNLOAD_CONCURRENCY: usize = 50;

/// Default grace period granted to in-flight work after an interrupt.
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 5;

/// Default capacity of each handoff queue. One is the smallest buffer tokio's
/// bounded channel provides, so a full queue suspends its sender.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;

/// Configuration errors detected before any stage starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A negative concurrency limit was supplied.
    #[error("invalid max download concurrency {value}: must not be negative")]
    NegativeConcurrency {
        /// The rejected value.
        value: i64,
    },

    /// A concurrency limit of zero would stall every fetch forever.
    #[error("invalid max download concurrency 0: no fetch could ever be admitted")]
    ZeroConcurrency,

    /// The concurrency limit exceeds what the admission gate can represent.
    #[error("invalid max download concurrency {value}: must be at most {max}")]
    ConcurrencyTooLarge {
        /// The rejected value.
        value: i64,
        /// Largest accepted value.
        max: usize,
    },

    /// A handoff queue needs room for at least one item.
    #[error("invalid queue capacity 0: must be at least 1")]
    ZeroQueueCapacity,
}

/// Validated settings for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    max_download_concurrency: usize,
    grace_period: Duration,
    queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_download_concurrency: DEFAULT_MAX_DOWNLOAD_CONCURRENCY,
            grace_period: Duration::from_secs(DEFAULT_GRACE_PERIOD_SECS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with the given concurrency limit and defaults
    /// for everything else.
    ///
    /// The limit arrives signed because it comes straight from user input;
    /// negative values and zero are rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the limit is negative, zero, or too large.
    pub fn new(max_download_concurrency: i64) -> Result<Self, ConfigError> {
        let max_download_concurrency = validate_concurrency(max_download_concurrency)?;
        Ok(Self {
            max_download_concurrency,
            ..Self::default()
        })
    }

    /// Sets the grace period granted after an interrupt.
    #[must_use]
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Sets the capacity of both handoff queues.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroQueueCapacity`] for zero.
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Result<Self, ConfigError> {
        if queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        self.queue_capacity = queue_capacity;
        Ok(self)
    }

    /// Returns the maximum number of fetches in flight.
    #[must_use]
    pub fn max_download_concurrency(&self) -> usize {
        self.max_download_concurrency
    }

    /// Returns the interrupt grace period.
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Returns the handoff queue capacity.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

/// Validates a user-supplied concurrency limit.
///
/// # Errors
///
/// Returns [`ConfigError`] if the value is negative, zero, or exceeds the
/// admission gate's maximum.
pub fn validate_concurrency(value: i64) -> Result<usize, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeConcurrency { value });
    }
    if value == 0 {
        return Err(ConfigError::ZeroConcurrency);
    }
    match usize::try_from(value) {
        Ok(limit) if limit <= Semaphore::MAX_PERMITS => Ok(limit),
        _ => Err(ConfigError::ConcurrencyTooLarge {
            value,
            max: Semaphore::MAX_PERMITS,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_download_concurrency(), 50);
        assert_eq!(config.grace_period(), Duration::from_secs(5));
        assert_eq!(config.queue_capacity(), 1);
    }

    #[test]
    fn test_config_new_accepts_positive_limit() {
        let config = PipelineConfig::new(7).unwrap();
        assert_eq!(config.max_download_concurrency(), 7);
        assert_eq!(config.grace_period(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_rejects_negative_concurrency() {
        assert_eq!(
            PipelineConfig::new(-1),
            Err(ConfigError::NegativeConcurrency { value: -1 })
        );
    }

    #[test]
    fn test_config_rejects_zero_concurrency() {
        assert_eq!(PipelineConfig::new(0), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_config_rejects_concurrency_above_semaphore_max() {
        let too_large = i64::try_from(Semaphore::MAX_PERMITS).unwrap() + 1;
        assert!(matches!(
            PipelineConfig::new(too_large),
            Err(ConfigError::ConcurrencyTooLarge { .. })
        ));
    }

    #[test]
    fn test_config_queue_capacity_zero_rejected() {
        let result = PipelineConfig::default().with_queue_capacity(0);
        assert_eq!(result, Err(ConfigError::ZeroQueueCapacity));

        let config = PipelineConfig::default().with_queue_capacity(8).unwrap();
        assert_eq!(config.queue_capacity(), 8);
    }

    #[test]
    fn test_config_error_display() {
        let msg = ConfigError::NegativeConcurrency { value: -3 }.to_string();
        assert!(msg.contains("-3"));
        assert!(msg.contains("negative"));
    }
}
