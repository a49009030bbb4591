//! Payment mandate types
//!
//! A mandate is a time-bounded payment authorization challenge. The payer
//! proves authorization by signing the challenge bytes; a mandate may be
//! consumed by at most one payment, and once its status leaves `Active`
//! it never returns.

use crate::{Amount, CartId, MandateId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a mandate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateStatus {
    /// Issued and usable
    Active,
    /// Consumed by exactly one payment
    Used,
    /// TTL elapsed before use
    Expired,
}

impl fmt::Display for MandateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// A payment authorization challenge bound to one cart and payer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandate {
    /// Mandate ID
    pub id: MandateId,
    /// Cart the payment is for
    pub cart_id: CartId,
    /// Opaque payer reference supplied by the caller
    pub payer_ref: String,
    /// Authorized amount
    pub amount: Amount,
    /// Seconds the mandate stays active after issuance
    pub ttl_seconds: i64,
    /// Challenge bytes the payer must sign; deterministically derived from
    /// the mandate's own identity and terms
    pub challenge: Vec<u8>,
    /// Issuance time
    pub created_at: DateTime<Utc>,
    /// Current status
    pub status: MandateStatus,
    /// Caller-supplied metadata, passed through untouched
    pub metadata: Option<serde_json::Value>,
}

impl Mandate {
    /// The instant the TTL elapses
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.ttl_seconds)
    }

    /// Whether the TTL has elapsed at `now`
    ///
    /// This is the lazy, authoritative check; the scheduled expiry timer
    /// is only an eager mirror of it.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn mandate(ttl_seconds: i64) -> Mandate {
        Mandate {
            id: MandateId::new(),
            cart_id: CartId::new(),
            payer_ref: "payer-1".to_string(),
            amount: Amount::from_major(250, Currency::USD),
            ttl_seconds,
            challenge: b"challenge".to_vec(),
            created_at: Utc::now(),
            status: MandateStatus::Active,
            metadata: None,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let fresh = mandate(300);
        assert!(!fresh.is_expired(Utc::now()));
        assert!(fresh.is_expired(fresh.expires_at() + Duration::seconds(1)));
    }

    #[test]
    fn test_past_ttl_is_immediately_expired() {
        let dead = mandate(-60);
        assert!(dead.is_expired(Utc::now()));
    }
}
