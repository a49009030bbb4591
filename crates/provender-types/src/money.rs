//! Money types in integer minor units
//!
//! Provender keeps all prices in minor units (cents) as `i64` so discount
//! and split-payment arithmetic floors to the currency's smallest unit by
//! construction. Ratios (discount retention, negotiation tolerance, split
//! percentages) are expressed in basis points.

use crate::{ProvenderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One hundred percent, in basis points
pub const BPS_SCALE: i64 = 10_000;

/// Supported settlement currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// The ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Decimal places of the minor unit
    pub fn decimals(&self) -> u32 {
        2
    }

    /// Parse an ISO 4217 code
    pub fn parse(code: &str) -> Result<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(ProvenderError::invalid_request(
                "currency",
                format!("unsupported currency code {other}"),
            )),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A currency amount in minor units
///
/// `value` is the number of minor units (cents). Arithmetic is checked;
/// ratio application floors, which is exactly the rounding rule quotes and
/// split payment terms require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    /// Minor units (e.g. cents for USD)
    pub minor: i64,
    /// The currency
    pub currency: Currency,
}

impl Amount {
    /// Create from minor units
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Create from whole currency units (e.g. dollars)
    pub fn from_major(major: i64, currency: Currency) -> Self {
        Self {
            minor: major * 100,
            currency,
        }
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Checked addition, rejecting currency mixing
    pub fn checked_add(&self, other: &Amount) -> Result<Amount> {
        self.ensure_same_currency(other)?;
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(ProvenderError::AmountOverflow)?;
        Ok(Self::from_minor(minor, self.currency))
    }

    /// Checked subtraction, rejecting currency mixing
    pub fn checked_sub(&self, other: &Amount) -> Result<Amount> {
        self.ensure_same_currency(other)?;
        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or(ProvenderError::AmountOverflow)?;
        Ok(Self::from_minor(minor, self.currency))
    }

    /// Multiply by an integer quantity
    pub fn checked_mul(&self, quantity: u32) -> Result<Amount> {
        let minor = self
            .minor
            .checked_mul(i64::from(quantity))
            .ok_or(ProvenderError::AmountOverflow)?;
        Ok(Self::from_minor(minor, self.currency))
    }

    /// Apply a basis-point ratio, flooring to the minor unit
    ///
    /// `600.00.apply_bps(9_000)` is `540.00`; odd remainders floor.
    pub fn apply_bps(&self, bps: i64) -> Result<Amount> {
        let scaled = (i128::from(self.minor) * i128::from(bps)) / i128::from(BPS_SCALE);
        let minor = i64::try_from(scaled).map_err(|_| ProvenderError::AmountOverflow)?;
        Ok(Self::from_minor(minor, self.currency))
    }

    /// The implied discount of `target` against this amount, in basis points
    ///
    /// Positive means `target` is cheaper. Zero-valued amounts yield zero.
    pub fn discount_bps_to(&self, target: &Amount) -> Result<i64> {
        self.ensure_same_currency(target)?;
        if self.minor == 0 {
            return Ok(0);
        }
        let diff = i128::from(self.minor) - i128::from(target.minor);
        let bps = diff * i128::from(BPS_SCALE) / i128::from(self.minor);
        i64::try_from(bps).map_err(|_| ProvenderError::AmountOverflow)
    }

    /// Whole-unit part (for human display)
    pub fn major(&self) -> i64 {
        self.minor / 100
    }

    fn ensure_same_currency(&self, other: &Amount) -> Result<()> {
        if self.currency != other.currency {
            return Err(ProvenderError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                actual: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        write!(f, "{}{}.{:02} {}", sign, abs / 100, abs % 100, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(major: i64) -> Amount {
        Amount::from_major(major, Currency::USD)
    }

    #[test]
    fn test_discount_floors_to_minor_unit() {
        // 600.00 * 0.90 = 540.00
        assert_eq!(usd(600).apply_bps(9_000).unwrap(), usd(540));
        // 333.33 * 0.85 = 283.3305 -> floors to 283.33
        let odd = Amount::from_minor(33_333, Currency::USD);
        assert_eq!(odd.apply_bps(8_500).unwrap().minor, 28_333);
    }

    #[test]
    fn test_discount_bps() {
        // 600 -> 492 is an 18% discount
        assert_eq!(usd(600).discount_bps_to(&usd(492)).unwrap(), 1_800);
        // asking for more than the current total is a negative discount
        assert!(usd(100).discount_bps_to(&usd(110)).unwrap() < 0);
        assert_eq!(usd(0).discount_bps_to(&usd(0)).unwrap(), 0);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let a = usd(10);
        let b = Amount::from_major(10, Currency::EUR);
        assert!(a.checked_add(&b).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_minor(123_45, Currency::USD).to_string(), "123.45 USD");
        assert_eq!(Amount::from_minor(-250, Currency::GBP).to_string(), "-2.50 GBP");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::parse("usd").unwrap(), Currency::USD);
        assert!(Currency::parse("XYZ").is_err());
    }
}
