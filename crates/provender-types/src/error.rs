//! Error types for Provender
//!
//! Every public operation converts internal faults to this taxonomy at its
//! boundary; no fault crosses a process boundary as anything other than a
//! structured error body.

use thiserror::Error;

/// Result type for Provender operations
pub type Result<T> = std::result::Result<T, ProvenderError>;

/// Provender error taxonomy
#[derive(Debug, Clone, Error)]
pub enum ProvenderError {
    // ========================================================================
    // Amount Errors
    // ========================================================================

    /// Amount overflow during arithmetic
    #[error("Amount overflow during arithmetic operation")]
    AmountOverflow,

    /// Currency mismatch
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    // ========================================================================
    // Catalog & Quote Errors
    // ========================================================================

    /// SKU not present in the vendor's catalog
    #[error("Unknown SKU {sku}")]
    UnknownSku { sku: String },

    /// Quote not found
    #[error("Quote {quote_id} not found")]
    QuoteNotFound { quote_id: String },

    /// Quote expired before the requested operation
    #[error("Quote {quote_id} expired at {expired_at}")]
    QuoteExpired { quote_id: String, expired_at: String },

    // ========================================================================
    // Cart Errors
    // ========================================================================

    /// Cart not found
    #[error("Cart {cart_id} not found")]
    CartNotFound { cart_id: String },

    /// Cart lock window elapsed
    #[error("Cart {cart_id} lock expired at {expired_at}")]
    CartLockExpired { cart_id: String, expired_at: String },

    /// Cart is not in the `locked` state
    #[error("Cart {cart_id} is not locked (status: {status})")]
    CartNotLocked { cart_id: String, status: String },

    // ========================================================================
    // Mandate & Payment Errors
    // ========================================================================

    /// Mandate not found
    #[error("Mandate {mandate_id} not found")]
    MandateNotFound { mandate_id: String },

    /// Mandate is not active
    #[error("Mandate {mandate_id} is not active (status: {status})")]
    InvalidMandateState { mandate_id: String, status: String },

    /// Mandate TTL elapsed
    #[error("Mandate {mandate_id} expired at {expired_at}")]
    MandateExpired {
        mandate_id: String,
        expired_at: String,
    },

    /// Signature does not verify against the challenge bytes
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// Payment not found
    #[error("Payment {payment_id} not found")]
    PaymentNotFound { payment_id: String },

    // ========================================================================
    // Orchestration Errors
    // ========================================================================

    /// Every queried vendor failed to produce a valid quote
    #[error("No quotes available: all {attempted} vendor(s) failed")]
    NoQuotesAvailable { attempted: usize },

    /// The settlement poll loop hit its wall-clock timeout
    #[error("Payment {payment_id} confirmation timed out after {waited_secs}s")]
    ConfirmationTimeout {
        payment_id: String,
        waited_secs: u64,
    },

    /// A vendor endpoint could not be reached or answered with a fault
    #[error("Vendor {vendor} unreachable: {reason}")]
    VendorUnreachable { vendor: String, reason: String },

    // ========================================================================
    // General Errors
    // ========================================================================

    /// Missing or malformed caller input
    #[error("Invalid request: {field} - {reason}")]
    InvalidRequest { field: String, reason: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ProvenderError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means a referenced entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::QuoteNotFound { .. }
                | Self::CartNotFound { .. }
                | Self::MandateNotFound { .. }
                | Self::PaymentNotFound { .. }
        )
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::UnknownSku { .. } => "UNKNOWN_SKU",
            Self::QuoteNotFound { .. } => "QUOTE_NOT_FOUND",
            Self::QuoteExpired { .. } => "QUOTE_EXPIRED",
            Self::CartNotFound { .. } => "CART_NOT_FOUND",
            Self::CartLockExpired { .. } => "CART_LOCK_EXPIRED",
            Self::CartNotLocked { .. } => "CART_NOT_LOCKED",
            Self::MandateNotFound { .. } => "MANDATE_NOT_FOUND",
            Self::InvalidMandateState { .. } => "INVALID_MANDATE_STATE",
            Self::MandateExpired { .. } => "MANDATE_EXPIRED",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::PaymentNotFound { .. } => "PAYMENT_NOT_FOUND",
            Self::NoQuotesAvailable { .. } => "NO_QUOTES_AVAILABLE",
            Self::ConfirmationTimeout { .. } => "CONFIRMATION_TIMEOUT",
            Self::VendorUnreachable { .. } => "VENDOR_UNREACHABLE",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ProvenderError::UnknownSku {
            sku: "SKU-X".to_string(),
        };
        assert_eq!(err.error_code(), "UNKNOWN_SKU");
        assert_eq!(
            ProvenderError::internal("boom").error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_not_found_classification() {
        let missing = ProvenderError::MandateNotFound {
            mandate_id: "mandate_x".to_string(),
        };
        assert!(missing.is_not_found());

        let expired = ProvenderError::MandateExpired {
            mandate_id: "mandate_x".to_string(),
            expired_at: "now".to_string(),
        };
        assert!(!expired.is_not_found());
    }
}
