//! Cart types
//!
//! A cart is a time-locked reservation of a priced quote. Everything is
//! copied from the quote at lock time, so later quote mutation never
//! affects an already-locked cart.

use crate::{Amount, CartId, DeliveryWindow, PaymentTerms, QuoteId, QuoteLineItem, VendorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a cart lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Reservation is held
    Locked,
    /// The lock window elapsed before payment
    Expired,
    /// Explicitly released by the caller
    Released,
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Locked => "locked",
            Self::Expired => "expired",
            Self::Released => "released",
        };
        write!(f, "{s}")
    }
}

/// A time-locked snapshot of an accepted quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID
    pub id: CartId,
    /// The quote this cart was locked from
    pub quote_id: QuoteId,
    /// Owning vendor
    pub vendor: VendorId,
    /// Total snapshot at lock time
    pub total: Amount,
    /// Line-item snapshot at lock time
    pub line_items: Vec<QuoteLineItem>,
    /// Delivery window snapshot
    pub delivery_window: DeliveryWindow,
    /// The reservation holds until this instant
    pub locked_until: DateTime<Utc>,
    /// Current status
    pub status: CartStatus,
    /// Payment terms snapshot, if the quote carried them
    pub payment_terms: Option<PaymentTerms>,
}

impl Cart {
    /// Whether the lock window has elapsed at `now`
    pub fn is_lock_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.locked_until
    }

    /// Whether this cart can still back a payment at `now`
    pub fn is_payable(&self, now: DateTime<Utc>) -> bool {
        self.status == CartStatus::Locked && !self.is_lock_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;
    use chrono::Duration;

    fn cart(locked_until: DateTime<Utc>, status: CartStatus) -> Cart {
        let now = Utc::now();
        Cart {
            id: CartId::new(),
            quote_id: QuoteId::new(),
            vendor: VendorId::from("standard"),
            total: Amount::from_major(100, Currency::USD),
            line_items: vec![],
            delivery_window: DeliveryWindow {
                start: now,
                end: now + Duration::hours(2),
            },
            locked_until,
            status,
            payment_terms: None,
        }
    }

    #[test]
    fn test_lock_expiry() {
        let now = Utc::now();
        let held = cart(now + Duration::minutes(15), CartStatus::Locked);
        assert!(!held.is_lock_expired(now));
        assert!(held.is_payable(now));

        let stale = cart(now - Duration::minutes(1), CartStatus::Locked);
        assert!(stale.is_lock_expired(now));
        assert!(!stale.is_payable(now));
    }

    #[test]
    fn test_released_cart_is_not_payable() {
        let now = Utc::now();
        let released = cart(now + Duration::minutes(15), CartStatus::Released);
        assert!(!released.is_payable(now));
    }
}
