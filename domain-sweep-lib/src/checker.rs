//! Availability check with bounded retry.
//!
//! A lookup error other than "no such domain" is assumed to be transient.
//! The checker retries with exponential backoff and, once the retry budget
//! is spent, answers [`CheckOutcome::Unknown`], which counts as unavailable.

use crate::events::{EventSink, ScanEvent};
use crate::protocols::DomainLookup;
use crate::types::CheckOutcome;
use std::time::Duration;

/// How many times to retry a failing lookup and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failure. Waits are `2^1 .. 2^max_attempts` units.
    pub max_attempts: u32,

    /// Length of one backoff unit
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }

    /// Number of backoff units to wait before retry number `attempt` (1-based).
    pub fn backoff_units(&self, attempt: u32) -> u64 {
        1u64.checked_shl(attempt).unwrap_or(u64::MAX)
    }

    /// Wall-clock wait before retry number `attempt`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let units = u32::try_from(self.backoff_units(attempt)).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(units)
    }
}

/// Checks one domain at a time against a [`DomainLookup`].
#[derive(Debug, Clone)]
pub struct AvailabilityChecker<L> {
    lookup: L,
    policy: RetryPolicy,
}

impl<L: DomainLookup> AvailabilityChecker<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_policy(lookup, RetryPolicy::default())
    }

    pub fn with_policy(lookup: L, policy: RetryPolicy) -> Self {
        Self { lookup, policy }
    }

    /// Check a domain, retrying transient failures.
    ///
    /// Never fails: retries are reported as `Retrying` events and running
    /// out of retries yields `Unknown` plus a `RetriesExhausted` event.
    pub async fn check<S: EventSink>(&self, domain: &str, sink: &S) -> CheckOutcome {
        let mut attempt: u32 = 1;

        loop {
            let error = match self.lookup.lookup(domain).await {
                Ok(outcome) => return CheckOutcome::from(&outcome),
                Err(e) => e,
            };

            if attempt > self.policy.max_attempts {
                tracing::debug!(domain = %domain, error = %error, "final lookup attempt failed");
                sink.emit(&ScanEvent::RetriesExhausted {
                    domain: domain.to_string(),
                    attempts: self.policy.max_attempts,
                });
                return CheckOutcome::Unknown { attempts: attempt };
            }

            let wait = self.policy.backoff_for(attempt);
            sink.emit(&ScanEvent::Retrying {
                domain: domain.to_string(),
                attempt,
                max_attempts: self.policy.max_attempts,
                wait_units: self.policy.backoff_units(attempt),
                wait,
                error: error.to_string(),
            });
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    /// Fail-closed boolean form of [`check`](Self::check).
    pub async fn is_available<S: EventSink>(&self, domain: &str, sink: &S) -> bool {
        self.check(domain, sink).await.is_available()
    }
}
