//! Configuration file parsing and management.
//!
//! Settings come from, in increasing precedence: built-in defaults, TOML
//! files (XDG, then home, then current directory), `DS_*` environment
//! variables, and finally command-line flags applied by the caller.

use crate::checker::RetryPolicy;
use crate::error::DomainSweepError;
use crate::protocols::WhoisClient;
use crate::scan::{ScanInputs, ScanOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest retry budget accepted from configuration.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Input and output locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsConfig>,

    /// Pacing and retry behaviour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanConfig>,
}

/// `[paths]` table. File names are relative to `data_dir` unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PathsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub names_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

/// `[scan]` table. Durations are strings like "500ms", "1s", "2m".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_server: Option<String>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainSweepError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainSweepError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainSweepError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainSweepError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Files that fail to parse are skipped (with a warning when verbose).
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainSweepError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("⚠️  Ignoring {}: {}", path.display(), e);
                    }
                }
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("⚠️  Multiple config files found. Later files override earlier ones:");
            for path in &loaded_files {
                eprintln!("   {}", path.display());
            }
        }

        Ok(merged_config)
    }

    /// Look for a configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-sweep.toml", "./.domain-sweep.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Look for a configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-sweep.toml", "domain-sweep.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-sweep").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            paths: match (lower.paths, higher.paths) {
                (Some(lower_paths), Some(higher_paths)) => Some(PathsConfig {
                    data_dir: higher_paths.data_dir.or(lower_paths.data_dir),
                    names_file: higher_paths.names_file.or(lower_paths.names_file),
                    extensions_file: higher_paths.extensions_file.or(lower_paths.extensions_file),
                    available_file: higher_paths.available_file.or(lower_paths.available_file),
                    unavailable_file: higher_paths
                        .unavailable_file
                        .or(lower_paths.unavailable_file),
                    log_file: higher_paths.log_file.or(lower_paths.log_file),
                }),
                (lower_paths, higher_paths) => higher_paths.or(lower_paths),
            },
            scan: match (lower.scan, higher.scan) {
                (Some(lower_scan), Some(higher_scan)) => Some(ScanConfig {
                    delay: higher_scan.delay.or(lower_scan.delay),
                    backoff_unit: higher_scan.backoff_unit.or(lower_scan.backoff_unit),
                    max_attempts: higher_scan.max_attempts.or(lower_scan.max_attempts),
                    whois_timeout: higher_scan.whois_timeout.or(lower_scan.whois_timeout),
                    whois_server: higher_scan.whois_server.or(lower_scan.whois_server),
                }),
                (lower_scan, higher_scan) => higher_scan.or(lower_scan),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainSweepError> {
        if let Some(scan) = &config.scan {
            if let Some(max_attempts) = scan.max_attempts {
                if max_attempts > MAX_RETRY_ATTEMPTS {
                    return Err(DomainSweepError::config(format!(
                        "max_attempts must be between 0 and {}",
                        MAX_RETRY_ATTEMPTS
                    )));
                }
            }

            let durations = [
                ("delay", &scan.delay),
                ("backoff_unit", &scan.backoff_unit),
                ("whois_timeout", &scan.whois_timeout),
            ];
            for (name, value) in durations {
                if let Some(value) = value {
                    if parse_duration_string(value).is_none() {
                        return Err(DomainSweepError::config(format!(
                            "Invalid {} format '{}'. Use format like '500ms', '5s', '2m'",
                            name, value
                        )));
                    }
                }
            }

            if let Some(timeout) = scan.whois_timeout.as_deref().and_then(parse_duration_string)
            {
                if timeout.is_zero() {
                    return Err(DomainSweepError::config("whois_timeout must be greater than zero"));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration (`DS_*`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub data_dir: Option<String>,
    pub delay: Option<Duration>,
    pub backoff_unit: Option<Duration>,
    pub max_attempts: Option<u32>,
    pub whois_timeout: Option<Duration>,
    pub whois_server: Option<String>,
    pub config: Option<String>,
}

/// Load configuration from the process environment.
///
/// Invalid values are ignored, with a warning when `verbose`.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok(), verbose)
}

/// Same as [`load_env_config`] with an explicit variable source.
pub fn load_env_config_from<F>(get: F, verbose: bool) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

    let duration = |key: &str| -> Option<Duration> {
        let raw = non_empty(key)?;
        match parse_duration_string(&raw) {
            Some(d) => {
                if verbose {
                    println!("🔧 Using {}={}", key, raw);
                }
                Some(d)
            }
            None => {
                if verbose {
                    eprintln!("⚠️ Invalid {}='{}', use format like '500ms', '5s', '2m'", key, raw);
                }
                None
            }
        }
    };

    env_config.delay = duration("DS_DELAY");
    env_config.backoff_unit = duration("DS_BACKOFF_UNIT");
    env_config.whois_timeout = duration("DS_WHOIS_TIMEOUT").filter(|d| !d.is_zero());

    if let Some(val) = non_empty("DS_MAX_ATTEMPTS") {
        match val.trim().parse::<u32>() {
            Ok(n) if n <= MAX_RETRY_ATTEMPTS => {
                env_config.max_attempts = Some(n);
                if verbose {
                    println!("🔧 Using DS_MAX_ATTEMPTS={}", n);
                }
            }
            _ => {
                if verbose {
                    eprintln!(
                        "⚠️ Invalid DS_MAX_ATTEMPTS='{}', must be 0-{}",
                        val, MAX_RETRY_ATTEMPTS
                    );
                }
            }
        }
    }

    env_config.data_dir = non_empty("DS_DATA_DIR");
    env_config.whois_server = non_empty("DS_WHOIS_SERVER");
    env_config.config = non_empty("DS_CONFIG");

    env_config
}

/// Fully resolved settings for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub data_dir: PathBuf,
    pub names_file: PathBuf,
    pub extensions_file: PathBuf,
    pub available_file: PathBuf,
    pub unavailable_file: PathBuf,
    /// `None` disables the log file
    pub log_file: Option<PathBuf>,
    pub delay: Duration,
    pub backoff_unit: Duration,
    pub max_attempts: u32,
    pub whois_timeout: Duration,
    pub whois_server: Option<String>,
}

impl Default for SweepConfig {
    /// The `data/` layout the tool has always used.
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            data_dir: PathBuf::from("data"),
            names_file: PathBuf::from("domain_names.txt"),
            extensions_file: PathBuf::from("extensions.txt"),
            available_file: PathBuf::from("available_domains.csv"),
            unavailable_file: PathBuf::from("unavailable_domains.csv"),
            log_file: Some(PathBuf::from("domain_sweep.log")),
            delay: ScanOptions::default().delay,
            backoff_unit: retry.backoff_unit,
            max_attempts: retry.max_attempts,
            whois_timeout: WhoisClient::new().timeout(),
            whois_server: None,
        }
    }
}

impl SweepConfig {
    /// Layer a file configuration over the current values.
    pub fn apply_file(&mut self, file: &FileConfig) {
        if let Some(paths) = &file.paths {
            if let Some(v) = &paths.data_dir {
                self.data_dir = PathBuf::from(v);
            }
            if let Some(v) = &paths.names_file {
                self.names_file = PathBuf::from(v);
            }
            if let Some(v) = &paths.extensions_file {
                self.extensions_file = PathBuf::from(v);
            }
            if let Some(v) = &paths.available_file {
                self.available_file = PathBuf::from(v);
            }
            if let Some(v) = &paths.unavailable_file {
                self.unavailable_file = PathBuf::from(v);
            }
            if let Some(v) = &paths.log_file {
                self.log_file = Some(PathBuf::from(v));
            }
        }

        if let Some(scan) = &file.scan {
            if let Some(d) = scan.delay.as_deref().and_then(parse_duration_string) {
                self.delay = d;
            }
            if let Some(d) = scan.backoff_unit.as_deref().and_then(parse_duration_string) {
                self.backoff_unit = d;
            }
            if let Some(n) = scan.max_attempts {
                self.max_attempts = n;
            }
            if let Some(d) = scan.whois_timeout.as_deref().and_then(parse_duration_string) {
                self.whois_timeout = d;
            }
            if let Some(server) = &scan.whois_server {
                self.whois_server = Some(server.clone());
            }
        }
    }

    /// Layer environment variables over the current values.
    pub fn apply_env(&mut self, env_config: &EnvConfig) {
        if let Some(v) = &env_config.data_dir {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(d) = env_config.delay {
            self.delay = d;
        }
        if let Some(d) = env_config.backoff_unit {
            self.backoff_unit = d;
        }
        if let Some(n) = env_config.max_attempts {
            self.max_attempts = n;
        }
        if let Some(d) = env_config.whois_timeout {
            self.whois_timeout = d;
        }
        if let Some(server) = &env_config.whois_server {
            self.whois_server = Some(server.clone());
        }
    }

    /// Resolve a file name against the data directory.
    fn in_data_dir(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn names_path(&self) -> PathBuf {
        self.in_data_dir(&self.names_file)
    }

    pub fn extensions_path(&self) -> PathBuf {
        self.in_data_dir(&self.extensions_file)
    }

    pub fn available_path(&self) -> PathBuf {
        self.in_data_dir(&self.available_file)
    }

    pub fn unavailable_path(&self) -> PathBuf {
        self.in_data_dir(&self.unavailable_file)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|f| self.in_data_dir(f))
    }

    pub fn inputs(&self) -> ScanInputs {
        ScanInputs {
            names: self.names_path(),
            extensions: self.extensions_path(),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            delay: self.delay,
            retry: RetryPolicy::default()
                .with_max_attempts(self.max_attempts)
                .with_backoff_unit(self.backoff_unit),
        }
    }

    pub fn whois_client(&self) -> WhoisClient {
        WhoisClient::with_timeout(self.whois_timeout).with_server(self.whois_server.clone())
    }
}

/// Parse a duration like "500ms", "5s", "2m"; a bare number means seconds.
pub fn parse_duration_string(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();

    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = value.strip_suffix('s') {
        s.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(m) = value.strip_suffix('m') {
        m.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        value.parse::<u64>().ok().map(Duration::from_secs)
    }
}
