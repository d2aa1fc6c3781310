//! Admission gate bounding concurrent fetches.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::config::ConfigError;
use super::error::PipelineError;

/// Counting limiter for in-flight fetches.
///
/// A slot is held through an [`AdmissionPermit`]; dropping the permit
/// releases the slot, including when the owning task panics or is cancelled.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held admission slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    /// Creates a gate with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroConcurrency`] for zero and
    /// [`ConfigError::ConcurrencyTooLarge`] above the semaphore maximum.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if capacity > Semaphore::MAX_PERMITS {
            return Err(ConfigError::ConcurrencyTooLarge {
                value: i64::try_from(capacity).unwrap_or(i64::MAX),
                max: Semaphore::MAX_PERMITS,
            });
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Returns the configured number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many slots are currently held.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Waits for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::GateClosed`] if the gate was closed.
    pub async fn acquire(&self) -> Result<AdmissionPermit, PipelineError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| PipelineError::GateClosed)?;
        Ok(AdmissionPermit { _permit: permit })
    }
}
