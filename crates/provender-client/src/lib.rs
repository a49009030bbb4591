//! Provender Client - Caller-side SDK
//!
//! Everything the ordering agent needs to buy from the cheapest vendor:
//!
//! - [`VendorClient`] / [`SettlementClient`]: typed HTTP clients
//! - [`VendorComparator`]: concurrent multi-vendor quote comparison
//! - [`MandateSigner`]: Ed25519 challenge signing
//! - [`SettlementWaiter`]: bounded settlement polling
//! - [`ProcurementFlow`]: the whole run, with a structured step report

pub mod comparator;
pub mod flow;
pub mod http;
pub mod preferences;
pub mod signer;
pub mod waiter;

pub use comparator::*;
pub use flow::*;
pub use http::*;
pub use preferences::*;
pub use signer::*;
pub use waiter::*;

use thiserror::Error;

/// Caller-side errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] provender_crypto::CryptoError),

    #[error(transparent)]
    Domain(#[from] provender_types::ProvenderError),

    #[error("No quotes available: all {attempted} vendor(s) failed")]
    NoQuotesAvailable { attempted: usize },

    #[error("Payment {payment_id} failed: {reason}")]
    PaymentFailed { payment_id: String, reason: String },

    #[error("Payment {payment_id} confirmation timed out after {waited_secs}s")]
    ConfirmationTimeout {
        payment_id: String,
        waited_secs: u64,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Stable code for reports and audit entries
    pub fn code(&self) -> &str {
        match self {
            Self::Api { code, .. } => code,
            Self::Network(_) => "NETWORK_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Crypto(_) => "CRYPTO_ERROR",
            Self::Domain(e) => e.error_code(),
            Self::NoQuotesAvailable { .. } => "NO_QUOTES_AVAILABLE",
            Self::PaymentFailed { .. } => "PAYMENT_FAILED",
            Self::ConfirmationTimeout { .. } => "CONFIRMATION_TIMEOUT",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }
}

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;
