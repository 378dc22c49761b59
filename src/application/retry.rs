//! Bounded retry with exponential backoff.
//!
//! Every external read in the crate funnels through [`RetryExecutor`]: pool
//! state reads on both chains and each wallet ledger call. The executor
//! only sleeps and re-invokes; it never inspects results beyond the
//! optional retry predicate.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::error::ConfigError;

/// Retry budget and backoff curve.
///
/// The delay before retry `n` (1-based) is
/// `min(base_delay * backoff_multiplier^(n-1), max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Retries after the first attempt; total attempts is one more.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryOptions {
    /// Ledger calls tolerate slower upstreams than pool reads.
    #[must_use]
    pub const fn ledger_default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
        }
    }

    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay slept after failed attempt `attempt` (1-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let raw = self.base_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = raw.min(self.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }

    /// Validate the option set, naming offending fields under `section`.
    pub fn validate(&self, section: &'static str) -> Result<(), ConfigError> {
        if !(self.backoff_multiplier.is_finite() && self.backoff_multiplier > 1.0) {
            return Err(ConfigError::InvalidValue {
                field: section,
                reason: format!(
                    "backoff_multiplier must be greater than 1, got {}",
                    self.backoff_multiplier
                ),
            });
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: section,
                reason: format!(
                    "max_delay_ms ({}) is below base_delay_ms ({})",
                    self.max_delay_ms, self.base_delay_ms
                ),
            });
        }
        Ok(())
    }
}

/// Runs fallible async operations under a [`RetryOptions`] budget.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    options: RetryOptions,
    component: String,
}

impl RetryExecutor {
    /// `component` labels the warn/error events emitted on failure.
    pub fn new(options: RetryOptions, component: impl Into<String>) -> Self {
        Self {
            options,
            component: component.into(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &RetryOptions {
        &self.options
    }

    /// Retry every failure until the budget is spent.
    ///
    /// Returns the first success, or the last error unchanged.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_when(op, |_| true).await
    }

    /// Retry only failures accepted by `should_retry`.
    ///
    /// A rejected failure is returned at once without sleeping.
    pub async fn run_when<T, E, F, Fut, P>(&self, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let total = self.options.total_attempts();
        let mut attempt = 1;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if attempt >= total {
                error!(
                    component = %self.component,
                    attempts = total,
                    error = %err,
                    "All attempts failed"
                );
                return Err(err);
            }

            if !should_retry(&err) {
                warn!(
                    component = %self.component,
                    attempt,
                    error = %err,
                    "Non-retryable failure"
                );
                return Err(err);
            }

            let delay = self.options.delay_for_attempt(attempt);
            warn!(
                component = %self.component,
                attempt,
                max_attempts = total,
                next_delay_ms = delay.as_millis() as u64,
                error = %err,
                "Attempt failed, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}
