//! WHOIS lookups through the system `whois` command.
//!
//! WHOIS responses are unstructured text that varies between registries.
//! This client only answers the question the scan cares about: is there a
//! registration record, and if so, what does its `Domain Name` field say.

use crate::error::DomainSweepError;
use crate::protocols::DomainLookup;
use crate::types::LookupOutcome;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tokio::process::Command;

lazy_static! {
    /// `Domain Name: EXAMPLE.COM` lines, any case, any indentation.
    static ref OWNER_FIELD: Regex =
        Regex::new(r"(?im)^[ \t]*domain[ \t]+name[ \t]*:[ \t]*(.*?)[ \t]*$")
            .expect("owner field pattern is valid");
}

/// Phrases registries use when no record exists.
const NOT_FOUND_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain not found",
    "status: free",
    "status: available",
    "no matching record",
    "domain status: no object found",
    "the queried object does not exist",
    "object does not exist",
    "no matching entry",
    "domain name not found",
    "this domain name has not been registered",
];

/// Phrases that mean the server refused to answer right now.
const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit exceeded",
    "too many requests",
    "try again later",
    "quota exceeded",
    "limit exceeded",
    "throttled",
    "rate-limited",
];

/// WHOIS client backed by the system's `whois` binary.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    /// Timeout for a single WHOIS query
    timeout: Duration,
    /// Query this server (`whois -h`) instead of letting `whois` pick one
    server: Option<String>,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            server: None,
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            server: None,
        }
    }

    /// Send every query to a specific WHOIS server.
    pub fn with_server<S: Into<String>>(mut self, server: Option<S>) -> Self {
        self.server = server.map(Into::into);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `whois [-h server] domain` and return its stdout.
    async fn execute_whois_command(&self, domain: &str) -> Result<String, DomainSweepError> {
        let mut command = Command::new("whois");
        if let Some(server) = &self.server {
            command.arg("-h").arg(server);
        }
        command.arg(domain).kill_on_drop(true);

        let output = command.output().await.map_err(|e| {
            DomainSweepError::whois(
                domain,
                format!(
                    "Failed to execute whois command: {}. Make sure 'whois' is installed.",
                    e
                ),
            )
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<LookupOutcome, DomainSweepError> {
        let output = tokio::time::timeout(self.timeout, self.execute_whois_command(domain))
            .await
            .map_err(|_| DomainSweepError::timeout("WHOIS query", self.timeout))??;

        parse_whois_response(domain, &output)
    }
}

/// Interpret raw WHOIS text.
///
/// Rate limiting and empty responses are errors so the checker retries them.
pub fn parse_whois_response(domain: &str, response: &str) -> Result<LookupOutcome, DomainSweepError> {
    let lower = response.to_lowercase();

    if lower.trim().is_empty() {
        return Err(DomainSweepError::whois(domain, "Empty WHOIS response"));
    }

    if RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Err(DomainSweepError::rate_limited(
            "whois",
            format!("Server refused query for {}", domain),
        ));
    }

    if NOT_FOUND_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Ok(LookupOutcome::NotFound);
    }

    let owners = OWNER_FIELD
        .captures_iter(response)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    Ok(LookupOutcome::found(owners))
}

/// Check if the system has a working whois command.
pub async fn is_whois_available() -> bool {
    match Command::new("whois").arg("--version").output().await {
        Ok(output) => output.status.success() || !output.stdout.is_empty(),
        Err(_) => false,
    }
}
