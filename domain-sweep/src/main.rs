//! Domain Sweep CLI Application
//!
//! Scans every combination of base names and extensions for unregistered
//! domains, recording results under the data directory so a scan can be
//! interrupted and resumed.

mod logging;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_sweep_lib::{
    load_env_config, parse_duration_string, ConfigManager, CsvStore, EventSink, ScanEvent,
    Scanner, SweepConfig, MAX_RETRY_ATTEMPTS,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-sweep
#[derive(Parser, Debug)]
#[command(name = "domain-sweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check every name x extension combination for available domains")]
#[command(
    long_about = "Check every name x extension combination for available domains.\n\nResults are saved after every lookup, so an interrupted scan resumes where it stopped."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Directory holding input lists, result files and the log
    #[arg(long = "data-dir", value_name = "DIR", help_heading = "Files")]
    pub data_dir: Option<PathBuf>,

    /// Base names, one per line (relative to the data directory)
    #[arg(long = "names", value_name = "FILE", help_heading = "Files")]
    pub names: Option<PathBuf>,

    /// Extensions, one per line (relative to the data directory)
    #[arg(long = "extensions", value_name = "FILE", help_heading = "Files")]
    pub extensions: Option<PathBuf>,

    /// CSV file collecting available domains
    #[arg(long = "available", value_name = "FILE", help_heading = "Files")]
    pub available: Option<PathBuf>,

    /// CSV file collecting unavailable domains
    #[arg(long = "unavailable", value_name = "FILE", help_heading = "Files")]
    pub unavailable: Option<PathBuf>,

    /// Pause between lookups (e.g. 1s, 500ms)
    #[arg(long = "delay", value_name = "DURATION", value_parser = parse_duration_arg, help_heading = "Pacing")]
    pub delay: Option<Duration>,

    /// Base unit of the retry backoff (waits are 2, 4, 8... units)
    #[arg(long = "backoff-unit", value_name = "DURATION", value_parser = parse_duration_arg, help_heading = "Pacing")]
    pub backoff_unit: Option<Duration>,

    /// Retries after a failed lookup before giving up (0-10)
    #[arg(long = "max-attempts", value_name = "N", value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_RETRY_ATTEMPTS)), help_heading = "Pacing")]
    pub max_attempts: Option<u32>,

    /// Timeout for a single WHOIS query
    #[arg(long = "whois-timeout", value_name = "DURATION", value_parser = parse_duration_arg, help_heading = "Lookup")]
    pub whois_timeout: Option<Duration>,

    /// Query this WHOIS server instead of the default referral
    #[arg(long = "whois-server", value_name = "HOST", help_heading = "Lookup")]
    pub whois_server: Option<String>,

    /// List the domains that still need checking and exit
    #[arg(long = "dry-run", help_heading = "Output")]
    pub dry_run: bool,

    /// Print the final summary (or dry-run list) as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Only print errors and the final summary
    #[arg(short = 'q', long = "quiet", help_heading = "Output")]
    pub quiet: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Write the log to this file (relative to the data directory)
    #[arg(long = "log-file", value_name = "FILE", conflicts_with = "no_log_file", help_heading = "Configuration")]
    pub log_file: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long = "no-log-file", help_heading = "Configuration")]
    pub no_log_file: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

fn parse_duration_arg(value: &str) -> Result<Duration, String> {
    parse_duration_string(value)
        .ok_or_else(|| format!("invalid duration '{}', use e.g. 500ms, 5s, 2m", value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Resolve settings: defaults < config files < environment < flags.
fn build_config(args: &Args) -> Result<SweepConfig, Box<dyn std::error::Error>> {
    let manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config(args.verbose);

    let config_path = args
        .config
        .as_deref()
        .or(env_config.config.as_deref().map(Path::new));
    let file_config = match config_path {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load().unwrap_or_default(),
    };

    let mut config = SweepConfig::default();
    config.apply_file(&file_config);
    config.apply_env(&env_config);
    apply_args(&mut config, args);

    Ok(config)
}

/// Apply command line flags over resolved configuration.
fn apply_args(config: &mut SweepConfig, args: &Args) {
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(path) = &args.names {
        config.names_file = path.clone();
    }
    if let Some(path) = &args.extensions {
        config.extensions_file = path.clone();
    }
    if let Some(path) = &args.available {
        config.available_file = path.clone();
    }
    if let Some(path) = &args.unavailable {
        config.unavailable_file = path.clone();
    }
    if let Some(d) = args.delay {
        config.delay = d;
    }
    if let Some(d) = args.backoff_unit {
        config.backoff_unit = d;
    }
    if let Some(n) = args.max_attempts {
        config.max_attempts = n;
    }
    if let Some(d) = args.whois_timeout {
        config.whois_timeout = d;
    }
    if let Some(server) = &args.whois_server {
        config.whois_server = Some(server.clone());
    }
    if args.no_log_file {
        config.log_file = None;
    } else if let Some(path) = &args.log_file {
        config.log_file = Some(path.clone());
    }
}

/// Main scan logic
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let sink = ui::ConsoleSink::new(args.quiet || args.json);

    let mut scanner = Scanner::new(
        config.whois_client(),
        config.inputs(),
        CsvStore::new(config.available_path()),
        CsvStore::new(config.unavailable_path()),
        &sink,
        config.scan_options(),
    );

    if args.dry_run {
        // read-only: no data directory, no log file
        logging::init(None, args.verbose)?;
        let plan = scanner.plan()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            for domain in &plan.pending {
                println!("{}", domain);
            }
        }
        eprintln!(
            "{} domains would be checked ({} already recorded)",
            plan.pending.len(),
            plan.skipped
        );
        return Ok(());
    }

    let data_dir_existed = config.data_dir.exists();
    std::fs::create_dir_all(&config.data_dir)?;

    logging::init(config.log_path().as_deref(), args.verbose)?;
    tracing::debug!(?config, "resolved configuration");

    if !data_dir_existed {
        sink.emit(&ScanEvent::DataDirCreated {
            path: config.data_dir.clone(),
        });
    }

    let start_time = std::time::Instant::now();
    let summary = scanner.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        ui::print_summary(&summary, start_time.elapsed());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_arg() {
        assert_eq!(parse_duration_arg("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration_arg("150ms"), Ok(Duration::from_millis(150)));
        assert!(parse_duration_arg("later").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "domain-sweep",
            "--data-dir",
            "scans",
            "--delay",
            "250ms",
            "--max-attempts",
            "2",
            "--no-log-file",
        ]);

        let mut config = SweepConfig::default();
        apply_args(&mut config, &args);

        assert_eq!(config.names_path(), Path::new("scans").join("domain_names.txt"));
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.log_path(), None);
    }

    #[test]
    fn test_max_attempts_range_checked() {
        let limit = MAX_RETRY_ATTEMPTS.to_string();
        let above = (MAX_RETRY_ATTEMPTS + 1).to_string();

        let args = Args::try_parse_from(["domain-sweep", "--max-attempts", limit.as_str()]).unwrap();
        assert_eq!(args.max_attempts, Some(MAX_RETRY_ATTEMPTS));
        assert!(Args::try_parse_from(["domain-sweep", "--max-attempts", above.as_str()]).is_err());
    }

    #[test]
    fn test_log_flags_conflict() {
        assert!(Args::try_parse_from([
            "domain-sweep",
            "--log-file",
            "x.log",
            "--no-log-file"
        ])
        .is_err());
    }
}
