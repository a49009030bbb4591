//! Payment record types
//!
//! A payment is created in `Processing` when a valid signed mandate is
//! presented, then resolves asynchronously to a terminal state.

use crate::{Amount, MandateId, PaymentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// Terminal states never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// One payment against one consumed mandate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment ID
    pub id: PaymentId,
    /// The mandate this payment consumed
    pub mandate_id: MandateId,
    /// Current status
    pub status: PaymentStatus,
    /// Settled amount
    pub amount: Amount,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
    /// Settlement rail transaction reference
    pub transaction_ref: Option<String>,
    /// Stated reason when the payment failed
    pub failure_reason: Option<String>,
}

impl Payment {
    /// Move to a terminal state, refusing to leave one
    pub fn resolve(&mut self, status: PaymentStatus, failure_reason: Option<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.failure_reason = failure_reason;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn payment() -> Payment {
        let now = Utc::now();
        Payment {
            id: PaymentId::new(),
            mandate_id: MandateId::new(),
            status: PaymentStatus::Processing,
            amount: Amount::from_major(100, Currency::USD),
            created_at: now,
            updated_at: now,
            transaction_ref: Some("txn_test".to_string()),
            failure_reason: None,
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PaymentStatus::Processing.is_terminal());
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_resolution_is_final() {
        let mut p = payment();
        p.resolve(PaymentStatus::Failed, Some("declined".to_string()));
        assert_eq!(p.status, PaymentStatus::Failed);

        // a second resolution must not overwrite the first
        p.resolve(PaymentStatus::Completed, None);
        assert_eq!(p.status, PaymentStatus::Failed);
        assert_eq!(p.failure_reason.as_deref(), Some("declined"));
    }
}
