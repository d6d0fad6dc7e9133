//! # Domain Sweep Library
//!
//! Resumable availability scans over every `name.extension` combination of
//! two input lists.
//!
//! Each candidate is looked up through a [`DomainLookup`] (the system
//! `whois` command by default), retried with exponential backoff when the
//! lookup fails, and appended to an available or unavailable result file.
//! Both files are rewritten after every check so an interrupted scan can be
//! resumed without repeating work.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_sweep_lib::{CsvStore, Scanner, SweepConfig, TracingSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SweepConfig::default();
//!     let mut scanner = Scanner::new(
//!         config.whois_client(),
//!         config.inputs(),
//!         CsvStore::new(config.available_path()),
//!         CsvStore::new(config.unavailable_path()),
//!         TracingSink,
//!         config.scan_options(),
//!     );
//!
//!     let summary = scanner.run().await?;
//!     println!("{} checked, {} available", summary.checked, summary.available);
//!     Ok(())
//! }
//! ```

pub use checker::{AvailabilityChecker, RetryPolicy};
pub use config::{
    load_env_config, load_env_config_from, parse_duration_string, ConfigManager, EnvConfig,
    FileConfig, PathsConfig, ScanConfig, SweepConfig, MAX_RETRY_ATTEMPTS,
};
pub use error::DomainSweepError;
pub use events::{EventLevel, EventSink, RecordingSink, ScanEvent, TracingSink};
pub use input::{generate_candidates, parse_list, pending_candidates, read_list};
pub use protocols::whois::parse_whois_response;
pub use protocols::{is_whois_available, DomainLookup, WhoisClient};
pub use scan::{finalize, ScanInputs, ScanOptions, ScanPhase, ScanPlan, Scanner};
pub use store::{CsvStore, ResultSet, ResultStore};
pub use types::{CheckOutcome, LookupOutcome, OneOrMany, ScanSummary};

mod checker;
mod config;
mod error;
mod events;
mod input;
mod protocols;
mod scan;
mod store;
mod types;

pub type Result<T> = std::result::Result<T, DomainSweepError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
