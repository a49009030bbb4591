//! Vendor pricing policy
//!
//! Each vendor runs the same engines with its own policy knobs: discount
//! rule, negotiation tolerance, quote validity, lock duration, delivery
//! hours, and optional split-payment terms.

use chrono::Duration;
use provender_types::{Amount, Currency, VendorId};

/// Volume discount applied once to a quote's final total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDiscount {
    /// Totals strictly above this trigger the discount
    pub threshold: Amount,
    /// Retention factor in basis points (9_000 keeps 90%)
    pub retention_bps: i64,
}

/// Delivery window hour range (UTC, on the day after the requested date)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// A vendor's complete pricing policy
#[derive(Debug, Clone)]
pub struct VendorProfile {
    /// Vendor slug
    pub id: VendorId,
    /// Human-readable name
    pub display_name: String,
    /// Currency the vendor quotes in
    pub currency: Currency,
    /// How long issued quotes stay valid
    pub quote_validity: Duration,
    /// Volume discount rule, if any
    pub volume_discount: Option<VolumeDiscount>,
    /// Largest counter-offer discount the vendor tolerates, in bps
    pub max_discount_bps: i64,
    /// How long a cart lock reserves the quote
    pub lock_duration: Duration,
    /// Initial percentage for split payment terms, if offered
    pub split_initial_percent: Option<u8>,
    /// Delivery window hours
    pub delivery_hours: DeliveryHours,
}

impl VendorProfile {
    /// The standard (budget) vendor: flexible on price, split terms offered
    pub fn standard() -> Self {
        Self {
            id: VendorId::from("standard"),
            display_name: "Standard Provisions Co.".to_string(),
            currency: Currency::USD,
            quote_validity: Duration::hours(2),
            volume_discount: Some(VolumeDiscount {
                threshold: Amount::from_major(500, Currency::USD),
                retention_bps: 9_000,
            }),
            max_discount_bps: 1_500,
            lock_duration: Duration::minutes(15),
            split_initial_percent: Some(30),
            delivery_hours: DeliveryHours {
                start_hour: 10,
                end_hour: 12,
            },
        }
    }

    /// The premium vendor: deeper volume discount, little price flexibility
    pub fn premium() -> Self {
        Self {
            id: VendorId::from("premium"),
            display_name: "Premium Pantry Ltd.".to_string(),
            currency: Currency::USD,
            quote_validity: Duration::hours(3),
            volume_discount: Some(VolumeDiscount {
                threshold: Amount::from_major(400, Currency::USD),
                retention_bps: 8_500,
            }),
            max_discount_bps: 800,
            lock_duration: Duration::minutes(20),
            split_initial_percent: None,
            delivery_hours: DeliveryHours {
                start_hour: 9,
                end_hour: 11,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let standard = VendorProfile::standard();
        assert_eq!(standard.max_discount_bps, 1_500);
        assert_eq!(standard.split_initial_percent, Some(30));

        let premium = VendorProfile::premium();
        assert!(premium.max_discount_bps < standard.max_discount_bps);
        assert!(premium.split_initial_percent.is_none());
        assert!(premium.quote_validity > standard.quote_validity);
    }
}
