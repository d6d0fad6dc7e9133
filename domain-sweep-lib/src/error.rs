//! Error handling for domain sweep operations.
//!
//! This module defines the error type shared by lookups, storage and the
//! scan driver. The checker retries every lookup failure; storage and
//! configuration failures end the scan.

use std::fmt;

/// Main error type for domain sweep operations.
#[derive(Debug, Clone)]
pub enum DomainSweepError {
    /// Input list or configuration file could not be read
    FileError { path: String, message: String },

    /// Result file could not be loaded or written
    StorageError { path: String, message: String },

    /// WHOIS lookup failed (command missing, unreadable response, etc.)
    WhoisError { domain: String, message: String },

    /// Timeout errors when a lookup takes too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// The WHOIS server refused to answer because of rate limiting
    RateLimited { service: String, message: String },

    /// Configuration errors (invalid settings, empty input lists)
    ConfigError { message: String },
}

impl DomainSweepError {
    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new storage error.
    pub fn storage<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::StorageError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::WhoisError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new rate limit error.
    pub fn rate_limited<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::RateLimited {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainSweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::StorageError { path, message } => {
                write!(f, "Storage error at '{}': {}", path, message)
            }
            Self::WhoisError { domain, message } => {
                write!(f, "WHOIS error for '{}': {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => write!(f, "Timeout after {:?} during: {}", duration, operation),
            Self::RateLimited { service, message } => {
                write!(f, "Rate limited by {}: {}", service, message)
            }
            Self::ConfigError { message } => write!(f, "Configuration error: {}", message),
        }
    }
}

impl std::error::Error for DomainSweepError {}
