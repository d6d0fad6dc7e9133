//! Registration lookup backends.
//!
//! The scan only needs one capability: "look up registration data for a
//! domain name, or fail". [`DomainLookup`] is that seam; [`WhoisClient`]
//! implements it on top of the system `whois` command.

use crate::error::DomainSweepError;
use crate::types::LookupOutcome;

/// WHOIS protocol implementation
pub mod whois;

pub use whois::{is_whois_available, WhoisClient};

/// Capability to look up registration data for a domain.
///
/// `Ok(LookupOutcome::NotFound)` is a positive answer, not an error. Any
/// `Err` is treated by the checker as transient and retried.
#[allow(async_fn_in_trait)]
pub trait DomainLookup {
    async fn lookup(&self, domain: &str) -> Result<LookupOutcome, DomainSweepError>;
}

impl<T: DomainLookup + ?Sized> DomainLookup for &T {
    async fn lookup(&self, domain: &str) -> Result<LookupOutcome, DomainSweepError> {
        (**self).lookup(domain).await
    }
}
