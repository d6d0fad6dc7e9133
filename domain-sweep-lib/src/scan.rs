//! Resumable scan driver.
//!
//! A scan walks through fixed phases:
//!
//! 1. `Loading`: read both result files and both input lists
//! 2. `Filtering`: drop candidates either result file already holds
//! 3. `Checking`: look up the rest one by one, saving both files after each
//! 4. `Finalizing`: sort both sets and save them once more
//!
//! Because every answer is persisted before the next lookup starts, an
//! interrupted scan loses at most the in-flight check and a rerun picks up
//! where the previous one stopped.

use crate::checker::{AvailabilityChecker, RetryPolicy};
use crate::error::DomainSweepError;
use crate::events::{EventSink, ScanEvent};
use crate::input::{generate_candidates, pending_candidates, read_list};
use crate::protocols::DomainLookup;
use crate::store::{ResultSet, ResultStore};
use crate::types::{CheckOutcome, ScanSummary};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Phase the driver is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Loading,
    Filtering,
    Checking,
    Finalizing,
    Done,
}

/// Where the two input lists live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInputs {
    pub names: PathBuf,
    pub extensions: PathBuf,
}

/// Tunables for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Pause between consecutive checks
    pub delay: Duration,

    /// Retry behaviour of each check
    pub retry: RetryPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of the loading and filtering phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanPlan {
    /// Candidates that still need a lookup, in generation order
    pub pending: Vec<String>,

    /// Candidates already recorded by an earlier run
    pub skipped: usize,

    #[serde(skip)]
    pub available: ResultSet,

    #[serde(skip)]
    pub unavailable: ResultSet,
}

/// Drives a full scan over injected lookup, storage and event sink.
pub struct Scanner<L, A, U, S> {
    checker: AvailabilityChecker<L>,
    inputs: ScanInputs,
    available_store: A,
    unavailable_store: U,
    sink: S,
    delay: Duration,
    phase: ScanPhase,
}

impl<L, A, U, S> Scanner<L, A, U, S>
where
    L: DomainLookup,
    A: ResultStore,
    U: ResultStore,
    S: EventSink,
{
    pub fn new(
        lookup: L,
        inputs: ScanInputs,
        available_store: A,
        unavailable_store: U,
        sink: S,
        options: ScanOptions,
    ) -> Self {
        Self {
            checker: AvailabilityChecker::with_policy(lookup, options.retry),
            inputs,
            available_store,
            unavailable_store,
            sink,
            delay: options.delay,
            phase: ScanPhase::Loading,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    fn enter(&mut self, phase: ScanPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "scan phase change");
        self.phase = phase;
    }

    /// Run the loading and filtering phases without any lookups.
    ///
    /// Fails with a configuration error when either input list is empty.
    pub fn plan(&mut self) -> Result<ScanPlan, DomainSweepError> {
        self.enter(ScanPhase::Loading);
        let available = ResultSet::from(self.available_store.load()?);
        let unavailable = ResultSet::from(self.unavailable_store.load()?);

        let names = read_list(&self.inputs.names, &self.sink);
        let extensions = read_list(&self.inputs.extensions, &self.sink);

        if names.is_empty() || extensions.is_empty() {
            tracing::error!("Domain names or extensions list is empty. Exiting.");
            return Err(DomainSweepError::config(
                "Domain names or extensions list is empty. Please check the input files.",
            ));
        }

        self.enter(ScanPhase::Filtering);
        let candidates = generate_candidates(&names, &extensions);
        let pending =
            pending_candidates(&candidates, available.as_slice(), unavailable.as_slice());
        let skipped = candidates.len() - pending.len();

        Ok(ScanPlan {
            pending,
            skipped,
            available,
            unavailable,
        })
    }

    /// Run the whole scan and return what happened.
    pub async fn run(&mut self) -> Result<ScanSummary, DomainSweepError> {
        let ScanPlan {
            pending,
            skipped,
            mut available,
            mut unavailable,
        } = self.plan()?;

        let mut summary = ScanSummary {
            skipped,
            ..ScanSummary::default()
        };
        self.sink.emit(&ScanEvent::ScanStarted {
            pending: pending.len(),
            skipped,
        });

        self.enter(ScanPhase::Checking);
        let total = pending.len();
        for (index, domain) in pending.iter().enumerate() {
            let outcome = self.checker.check(domain, &self.sink).await;
            summary.record(outcome);

            match outcome {
                CheckOutcome::Available => available.push(domain.as_str()),
                CheckOutcome::Unavailable | CheckOutcome::Unknown { .. } => {
                    unavailable.push(domain.as_str())
                }
            }
            self.sink.emit(&ScanEvent::Checked {
                domain: domain.clone(),
                available: outcome.is_available(),
            });

            self.available_store.save(available.as_slice())?;
            self.unavailable_store.save(unavailable.as_slice())?;

            let done = index + 1;
            self.sink.emit(&ScanEvent::Progress {
                index: done,
                total,
                delay: self.delay,
            });
            if done < total {
                tokio::time::sleep(self.delay).await;
            }
        }

        self.enter(ScanPhase::Finalizing);
        finalize(
            &mut available,
            &mut unavailable,
            &self.available_store,
            &self.unavailable_store,
        )?;
        self.sink.emit(&ScanEvent::Finalized {
            available: available.as_slice().len(),
            unavailable: unavailable.as_slice().len(),
        });

        summary.total_available = available.as_slice().len();
        summary.total_unavailable = unavailable.as_slice().len();
        self.enter(ScanPhase::Done);

        Ok(summary)
    }
}

/// Sort both result sets ascending and persist them.
pub fn finalize<A: ResultStore, U: ResultStore>(
    available: &mut ResultSet,
    unavailable: &mut ResultSet,
    available_store: &A,
    unavailable_store: &U,
) -> Result<(), DomainSweepError> {
    available.sort();
    unavailable.sort();
    available_store.save(available.as_slice())?;
    unavailable_store.save(unavailable.as_slice())?;
    Ok(())
}
