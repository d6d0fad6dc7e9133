//! Terminal output for domain-sweep.
//!
//! Every scan event is logged through `tracing` and also printed as a
//! human-readable line. Errors go to stderr; everything else to stdout.

use console::style;
use domain_sweep_lib::{EventLevel, EventSink, ScanEvent, ScanSummary, TracingSink};
use std::time::Duration;

/// Event sink that prints styled lines and forwards to the log.
pub struct ConsoleSink {
    quiet: bool,
    log: TracingSink,
}

impl ConsoleSink {
    /// A quiet sink still prints error-level events.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            log: TracingSink,
        }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &ScanEvent) {
        self.log.emit(event);

        let line = format_event(event);
        match event.level() {
            EventLevel::Error => eprintln!("{}", line),
            _ if self.quiet => {}
            _ => println!("{}", line),
        }
    }
}

/// Render one event for the terminal.
pub fn format_event(event: &ScanEvent) -> String {
    match event {
        ScanEvent::Checked {
            domain,
            available: true,
        } => format!("{} {}", style("Available:").green().bold(), domain),
        ScanEvent::Checked {
            domain,
            available: false,
        } => format!("{} {}", style("Unavailable:").red(), domain),
        ScanEvent::Retrying { .. } => {
            format!("{} {}", style("Warning:").yellow().bold(), event)
        }
        ScanEvent::RetriesExhausted { .. } => {
            format!("{} {}", style("Error:").red().bold(), event)
        }
        ScanEvent::InputMissing { .. } => style(event.to_string()).red().to_string(),
        ScanEvent::Progress { .. } => style(event.to_string()).dim().to_string(),
        ScanEvent::ScanStarted { skipped, .. } if *skipped > 0 => format!(
            "{} {}",
            style(event.to_string()).bold(),
            style(format!("({} already recorded)", skipped)).dim()
        ),
        other => style(other.to_string()).bold().to_string(),
    }
}

/// Print the closing summary of a completed scan.
pub fn print_summary(summary: &ScanSummary, duration: Duration) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} checked in {:.1}s  {}  {}  {}  {}",
        style(summary.checked).bold(),
        if summary.checked == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", summary.available)).green(),
        style("|").dim(),
        style(format!(
            "{} unavailable",
            summary.unavailable + summary.assumed_unavailable
        ))
        .red(),
    );
    if summary.assumed_unavailable > 0 {
        println!(
            "  {} {} recorded as unavailable after failed lookups",
            style("•").yellow(),
            summary.assumed_unavailable
        );
    }
    println!(
        "  {} files now hold {} available and {} unavailable domains (sorted)",
        style("•").dim(),
        summary.total_available,
        summary.total_unavailable
    );
    println!("Domain checking completed and CSV files have been sorted.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    fn plain(event: &ScanEvent) -> String {
        strip_ansi_codes(&format_event(event)).to_string()
    }

    #[test]
    fn test_checked_lines() {
        let available = ScanEvent::Checked {
            domain: "shop.com".to_string(),
            available: true,
        };
        let taken = ScanEvent::Checked {
            domain: "shop.net".to_string(),
            available: false,
        };
        assert_eq!(plain(&available), "Available: shop.com");
        assert_eq!(plain(&taken), "Unavailable: shop.net");
    }

    #[test]
    fn test_retry_line() {
        let event = ScanEvent::Retrying {
            domain: "transient.com".to_string(),
            attempt: 2,
            max_attempts: 5,
            wait_units: 4,
            wait: Duration::from_secs(4),
            error: "WHOIS error for 'transient.com': reset".to_string(),
        };
        let line = plain(&event);
        assert!(line.starts_with("Warning: Error checking transient.com"));
        assert!(line.ends_with("Retrying in 4 seconds (Attempt 2/5)."));
    }

    #[test]
    fn test_scan_started_mentions_skipped() {
        let event = ScanEvent::ScanStarted {
            pending: 3,
            skipped: 5,
        };
        assert_eq!(plain(&event), "Total domains to check: 3 (5 already recorded)");

        let fresh = ScanEvent::ScanStarted {
            pending: 3,
            skipped: 0,
        };
        assert_eq!(plain(&fresh), "Total domains to check: 3");
    }
}
