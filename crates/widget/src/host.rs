//! CRM record-population integration point.

use quotelink_core::QuotePayload;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host rejected record population: {0}")]
    Rejected(String),
    #[error("host integration unavailable")]
    Unavailable,
}

/// Opaque "populate record" call exposed by the hosting CRM.
pub trait QuoteHost: Send + Sync {
    fn populate(&self, payload: &QuotePayload) -> Result<(), HostError>;
}

/// Host for contexts without a CRM behind them.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableHost;

impl QuoteHost for UnavailableHost {
    fn populate(&self, _payload: &QuotePayload) -> Result<(), HostError> {
        Err(HostError::Unavailable)
    }
}
