//! Quote types
//!
//! A quote is the vendor's priced answer to a line-item request. Line
//! totals are fixed at quote creation; negotiation may replace quantities
//! and recompute line totals, never the unit price snapshot.

use crate::{Amount, ProvenderError, QuoteId, Result, VendorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    /// SKU in the owning vendor's catalog
    pub sku: String,
    /// Resolved quantity (>= requested, clamped up to the catalog minimum)
    pub quantity: u32,
    /// Unit price snapshot taken at quote creation
    pub unit_price: Amount,
    /// unit_price x quantity
    pub line_total: Amount,
}

impl QuoteLineItem {
    /// Build a line, computing its total
    pub fn new(sku: impl Into<String>, quantity: u32, unit_price: Amount) -> Result<Self> {
        let line_total = unit_price.checked_mul(quantity)?;
        Ok(Self {
            sku: sku.into(),
            quantity,
            unit_price,
            line_total,
        })
    }

    /// Replace the quantity and recompute the line total
    ///
    /// The unit price snapshot is never touched.
    pub fn adjust_quantity(&mut self, quantity: u32) -> Result<()> {
        self.quantity = quantity;
        self.line_total = self.unit_price.checked_mul(quantity)?;
        Ok(())
    }
}

/// A delivery date-time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Split payment terms: an initial portion due at confirmation and the
/// remainder due on delivery, each independently mandated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerms {
    /// Percentage of the total due up front (0..=100)
    pub initial_percent: u8,
    /// floor(total * initial_percent / 100)
    pub initial_payment: Amount,
    /// total - initial_payment
    pub delivery_payment: Amount,
}

impl PaymentTerms {
    /// Split a total by the given initial percentage
    pub fn split(total: &Amount, initial_percent: u8) -> Result<Self> {
        let initial_payment = total.apply_bps(i64::from(initial_percent) * 100)?;
        let delivery_payment = total.checked_sub(&initial_payment)?;
        Ok(Self {
            initial_percent,
            initial_payment,
            delivery_payment,
        })
    }

    /// Recompute both portions from a new total, keeping the percentage
    pub fn recompute(&mut self, total: &Amount) -> Result<()> {
        *self = Self::split(total, self.initial_percent)?;
        Ok(())
    }
}

/// A priced quote owned by one vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Quote ID, unique and vendor-scoped
    pub id: QuoteId,
    /// Owning vendor
    pub vendor: VendorId,
    /// Ordered line items
    pub line_items: Vec<QuoteLineItem>,
    /// Authoritative total; equals the line-item sum unless a volume
    /// discount was applied, in which case the discounted value governs
    pub total: Amount,
    /// Agreed delivery range
    pub delivery_window: DeliveryWindow,
    /// After this instant the quote must be rejected for new cart locks
    pub expires_at: DateTime<Utc>,
    /// Split payment terms, for vendors that offer them
    pub payment_terms: Option<PaymentTerms>,
}

impl Quote {
    /// Sum of the line totals (before any volume discount)
    pub fn line_item_sum(&self) -> Result<Amount> {
        let mut sum = Amount::zero(self.total.currency);
        for line in &self.line_items {
            sum = sum.checked_add(&line.line_total)?;
        }
        Ok(sum)
    }

    /// Whether the quote has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Find a line item by SKU
    pub fn line_item_mut(&mut self, sku: &str) -> Result<&mut QuoteLineItem> {
        self.line_items
            .iter_mut()
            .find(|line| line.sku == sku)
            .ok_or_else(|| ProvenderError::UnknownSku {
                sku: sku.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;
    use chrono::Duration;

    fn usd(minor: i64) -> Amount {
        Amount::from_minor(minor, Currency::USD)
    }

    fn quote_with_lines() -> Quote {
        let now = Utc::now();
        Quote {
            id: QuoteId::new(),
            vendor: VendorId::from("standard"),
            line_items: vec![
                QuoteLineItem::new("SKU-A", 10, usd(1_000)).unwrap(),
                QuoteLineItem::new("SKU-B", 4, usd(250)).unwrap(),
            ],
            total: usd(11_000),
            delivery_window: DeliveryWindow {
                start: now,
                end: now + Duration::hours(2),
            },
            expires_at: now + Duration::hours(2),
            payment_terms: None,
        }
    }

    #[test]
    fn test_line_total_computation() {
        let line = QuoteLineItem::new("SKU-A", 20, usd(1_000)).unwrap();
        assert_eq!(line.line_total, usd(20_000));
    }

    #[test]
    fn test_adjust_quantity_keeps_unit_price() {
        let mut line = QuoteLineItem::new("SKU-A", 5, usd(300)).unwrap();
        line.adjust_quantity(8).unwrap();
        assert_eq!(line.unit_price, usd(300));
        assert_eq!(line.line_total, usd(2_400));
    }

    #[test]
    fn test_line_item_sum() {
        let quote = quote_with_lines();
        assert_eq!(quote.line_item_sum().unwrap(), usd(11_000));
    }

    #[test]
    fn test_payment_terms_split_and_recompute() {
        let mut terms = PaymentTerms::split(&usd(54_000), 30).unwrap();
        assert_eq!(terms.initial_payment, usd(16_200));
        assert_eq!(terms.delivery_payment, usd(37_800));

        terms.recompute(&usd(50_001)).unwrap();
        assert_eq!(terms.initial_payment, usd(15_000));
        assert_eq!(
            terms
                .initial_payment
                .checked_add(&terms.delivery_payment)
                .unwrap(),
            usd(50_001)
        );
    }

    #[test]
    fn test_quote_expiry() {
        let quote = quote_with_lines();
        assert!(!quote.is_expired(Utc::now()));
        assert!(quote.is_expired(Utc::now() + Duration::hours(3)));
    }
}
