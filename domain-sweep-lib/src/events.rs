//! Observability for scans.
//!
//! The scanner and checker never print or configure logging themselves.
//! They report [`ScanEvent`]s to an [`EventSink`] handed in by the caller.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Severity of a scan event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

/// Something worth reporting while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// An input list could not be read and was treated as empty
    InputMissing { path: PathBuf, message: String },

    /// The data directory did not exist and was created
    DataDirCreated { path: PathBuf },

    /// Filtering finished
    ScanStarted { pending: usize, skipped: usize },

    /// A candidate received a definitive answer
    Checked { domain: String, available: bool },

    /// A lookup failed and will be retried after a backoff
    Retrying {
        domain: String,
        attempt: u32,
        max_attempts: u32,
        wait_units: u64,
        wait: Duration,
        error: String,
    },

    /// Every retry failed; the domain is recorded as unavailable
    RetriesExhausted { domain: String, attempts: u32 },

    /// One candidate done, pausing before the next
    Progress {
        index: usize,
        total: usize,
        delay: Duration,
    },

    /// Both result sets were sorted and saved
    Finalized { available: usize, unavailable: usize },
}

impl ScanEvent {
    /// Severity of the event.
    ///
    /// Only `Retrying` is a warning, so warnings count retries one to one.
    /// Running out of retries is reported at error level, next to the
    /// `Unknown` outcome the checker returns for it.
    pub fn level(&self) -> EventLevel {
        match self {
            ScanEvent::InputMissing { .. } | ScanEvent::RetriesExhausted { .. } => {
                EventLevel::Error
            }
            ScanEvent::Retrying { .. } => EventLevel::Warning,
            _ => EventLevel::Info,
        }
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanEvent::InputMissing { path, .. } => {
                write!(f, "Error: The file {} does not exist.", path.display())
            }
            ScanEvent::DataDirCreated { path } => {
                write!(f, "Created data folder at {}", path.display())
            }
            ScanEvent::ScanStarted { pending, .. } => {
                write!(f, "Total domains to check: {}", pending)
            }
            ScanEvent::Checked { domain, available } => {
                if *available {
                    write!(f, "Available: {}", domain)
                } else {
                    write!(f, "Unavailable: {}", domain)
                }
            }
            ScanEvent::Retrying {
                domain,
                attempt,
                max_attempts,
                wait,
                error,
                ..
            } => write!(
                f,
                "Error checking {}: {}. Retrying in {} (Attempt {}/{}).",
                domain,
                error,
                describe_duration(*wait),
                attempt,
                max_attempts
            ),
            ScanEvent::RetriesExhausted { domain, attempts } => {
                write!(f, "Failed to check {} after {} attempts.", domain, attempts)
            }
            ScanEvent::Progress {
                index,
                total,
                delay,
            } => write!(
                f,
                "Checked {}/{} domains. Sleeping for {}.",
                index,
                total,
                describe_duration(*delay)
            ),
            ScanEvent::Finalized { .. } => {
                write!(f, "Sorted and saved available and unavailable domain files.")
            }
        }
    }
}

/// Render a duration the way progress lines read best.
fn describe_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        let secs = duration.as_secs();
        if secs == 1 {
            "1 second".to_string()
        } else {
            format!("{} seconds", secs)
        }
    } else {
        format!("{} ms", duration.as_millis())
    }
}

/// Receiver for scan events.
pub trait EventSink {
    fn emit(&self, event: &ScanEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, event: &ScanEvent) {
        (**self).emit(event)
    }
}

/// Sink that forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ScanEvent) {
        match event {
            ScanEvent::InputMissing { path, message } => {
                tracing::error!(path = %path.display(), reason = %message, "File not found: {}", path.display());
            }
            ScanEvent::Checked { domain, available } => {
                tracing::info!(domain = %domain, available = *available, "{}", event);
            }
            ScanEvent::Retrying {
                domain,
                attempt,
                max_attempts,
                wait_units,
                ..
            } => {
                tracing::warn!(
                    domain = %domain,
                    attempt = *attempt,
                    max_attempts = *max_attempts,
                    wait_units = *wait_units,
                    "{}",
                    event
                );
            }
            ScanEvent::RetriesExhausted { domain, attempts } => {
                tracing::error!(domain = %domain, attempts = *attempts, "{}", event);
            }
            ScanEvent::Progress { index, total, .. } => {
                tracing::info!(index = *index, total = *total, "{}", event);
            }
            other => match other.level() {
                EventLevel::Info => tracing::info!("{}", other),
                EventLevel::Warning => tracing::warn!("{}", other),
                EventLevel::Error => tracing::error!("{}", other),
            },
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ScanEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ScanEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Events at the given level, in arrival order.
    pub fn at_level(&self, level: EventLevel) -> Vec<ScanEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == level)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ScanEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_line_matches_progress_format() {
        let event = ScanEvent::Retrying {
            domain: "transient.com".to_string(),
            attempt: 1,
            max_attempts: 5,
            wait_units: 2,
            wait: Duration::from_secs(2),
            error: "Temporary error".to_string(),
        };
        assert_eq!(event.level(), EventLevel::Warning);
        assert_eq!(
            event.to_string(),
            "Error checking transient.com: Temporary error. Retrying in 2 seconds (Attempt 1/5)."
        );
    }

    #[test]
    fn test_levels() {
        let checked = ScanEvent::Checked {
            domain: "a.com".to_string(),
            available: true,
        };
        assert_eq!(checked.level(), EventLevel::Info);
        assert_eq!(checked.to_string(), "Available: a.com");

        let exhausted = ScanEvent::RetriesExhausted {
            domain: "a.com".to_string(),
            attempts: 5,
        };
        assert_eq!(exhausted.level(), EventLevel::Error);
        assert_eq!(exhausted.to_string(), "Failed to check a.com after 5 attempts.");
    }

    #[test]
    fn test_progress_line() {
        let event = ScanEvent::Progress {
            index: 3,
            total: 10,
            delay: Duration::from_secs(1),
        };
        assert_eq!(
            event.to_string(),
            "Checked 3/10 domains. Sleeping for 1 second."
        );

        let event = ScanEvent::Progress {
            index: 1,
            total: 2,
            delay: Duration::from_millis(250),
        };
        assert_eq!(event.to_string(), "Checked 1/2 domains. Sleeping for 250 ms.");
    }

    #[test]
    fn test_recording_sink_filters_by_level() {
        let sink = RecordingSink::new();
        sink.emit(&ScanEvent::ScanStarted {
            pending: 2,
            skipped: 0,
        });
        sink.emit(&ScanEvent::RetriesExhausted {
            domain: "a.com".to_string(),
            attempts: 5,
        });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.at_level(EventLevel::Error).len(), 1);
        assert!(sink.at_level(EventLevel::Warning).is_empty());
    }
}
