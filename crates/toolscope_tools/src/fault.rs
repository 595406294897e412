//! Seeded transient-failure injection.
//!
//! A [`FaultInjector`] lets a tool simulate a flaky backend so that retry
//! handling further up the pipeline can be exercised. It is opt-in: the
//! default injector never fails. Give it a seed to make the failure
//! sequence reproducible across runs.
//!
//! Injected failures carry a [`TransientFault`] JSON payload that tells the
//! model the call may be retried.

use crate::error::ToolError;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Payload of an injected transient failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransientFault {
    /// Short machine-readable cause.
    pub error: String,
    /// Human-readable explanation for the model.
    pub message: String,
    /// `"true"` when the call may be retried.
    pub retry: String,
}

impl TransientFault {
    /// Creates a retryable fault.
    #[must_use]
    pub fn retryable(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            retry: "true".to_string(),
        }
    }

    /// Parses a tool payload back into a fault, if it is one.
    #[must_use]
    pub fn parse(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }

    /// Returns `true` if the fault says the call may be retried.
    #[must_use]
    pub fn should_retry(&self) -> bool {
        self.retry == "true"
    }
}

impl Default for TransientFault {
    fn default() -> Self {
        Self::retryable(
            "service temporarily unavailable",
            "The service is temporarily unavailable. Please retry later.",
        )
    }
}

/// Probability-driven failure source.
///
/// # Example
///
/// ```
/// use toolscope_tools::FaultInjector;
///
/// let faults = FaultInjector::with_probability(0.5).with_seed(7);
/// let outcomes: Vec<bool> = (0..8).map(|_| faults.check().is_err()).collect();
///
/// // Same seed, same sequence.
/// let again = FaultInjector::with_probability(0.5).with_seed(7);
/// let replay: Vec<bool> = (0..8).map(|_| again.check().is_err()).collect();
/// assert_eq!(outcomes, replay);
/// ```
#[derive(Debug)]
pub struct FaultInjector {
    probability: f64,
    fault: TransientFault,
    rng: Mutex<StdRng>,
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::disabled()
    }
}

impl FaultInjector {
    /// An injector that never fails.
    #[must_use]
    pub fn disabled() -> Self {
        Self::with_probability(0.0)
    }

    /// An injector that fails with the given probability, clamped to `[0, 1]`.
    /// A NaN probability disables injection.
    ///
    /// Seeded from the OS until [`with_seed`](Self::with_seed) is called.
    #[must_use]
    pub fn with_probability(probability: f64) -> Self {
        Self {
            probability: if probability.is_nan() {
                0.0
            } else {
                probability.clamp(0.0, 1.0)
            },
            fault: TransientFault::default(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Makes the failure sequence deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Replaces the payload returned on failure.
    #[must_use]
    pub fn with_fault(mut self, fault: TransientFault) -> Self {
        self.fault = fault;
        self
    }

    /// Returns the configured failure probability.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Rolls once.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Execution`] carrying the JSON-encoded
    /// [`TransientFault`] when the roll fails.
    pub fn check(&self) -> Result<(), ToolError> {
        if self.probability <= 0.0 {
            return Ok(());
        }
        let roll: f64 = self.rng.lock().random();
        if roll < self.probability {
            let payload = serde_json::to_string(&self.fault)?;
            return Err(ToolError::Execution(payload));
        }
        Ok(())
    }
}
