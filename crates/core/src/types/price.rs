//! Display-currency prices.
//!
//! Catalog prices are decimals in a source currency. The cart only ever
//! stores whole display-currency units: a price is converted once, when the
//! item is added, and the resulting integer travels with the line item from
//! then on.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`DisplayCurrency`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The currency code is not supported.
    #[error("unsupported currency code: {0}")]
    UnknownCode(String),
    /// The exchange rate must be strictly positive.
    #[error("exchange rate must be positive (got {0})")]
    NonPositiveRate(Decimal),
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    INR,
}

impl CurrencyCode {
    /// Symbol shown in front of an amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::INR => "₹",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::INR => "INR",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "INR" => Ok(Self::INR),
            other => Err(CurrencyError::UnknownCode(other.to_string())),
        }
    }
}

/// The currency prices are shown and stored in, plus the rate from the
/// catalog's source currency.
///
/// ```
/// use pocket_shop_core::{CurrencyCode, DisplayCurrency};
/// use rust_decimal::Decimal;
///
/// let inr = DisplayCurrency::new(CurrencyCode::INR, Decimal::new(83, 0)).unwrap();
/// assert_eq!(inr.convert(Decimal::new(1999, 2)), Some(1659));
/// assert_eq!(inr.format(125_000), "₹125,000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCurrency {
    code: CurrencyCode,
    rate: Decimal,
}

impl DisplayCurrency {
    /// Create a display currency with a source-to-display exchange rate.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::NonPositiveRate`] if `rate` is zero or negative.
    pub fn new(code: CurrencyCode, rate: Decimal) -> Result<Self, CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::NonPositiveRate(rate));
        }
        Ok(Self { code, rate })
    }

    /// The display currency's code.
    #[must_use]
    pub const fn code(&self) -> CurrencyCode {
        self.code
    }

    /// The source-to-display exchange rate.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// Convert a source-currency price to whole display-currency units.
    ///
    /// Rounds to the nearest unit, midpoints away from zero. Returns `None`
    /// for negative prices or results that do not fit in a `u64`.
    #[must_use]
    pub fn convert(&self, source: Decimal) -> Option<u64> {
        if source.is_sign_negative() && !source.is_zero() {
            return None;
        }
        source
            .checked_mul(self.rate)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
    }

    /// Format an amount with the currency symbol and thousands separators.
    #[must_use]
    pub fn format(&self, amount: u64) -> String {
        format!("{}{}", self.code.symbol(), group_thousands(amount))
    }
}

impl Default for DisplayCurrency {
    fn default() -> Self {
        Self {
            code: CurrencyCode::default(),
            rate: Decimal::ONE,
        }
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd() -> DisplayCurrency {
        DisplayCurrency::default()
    }

    #[test]
    fn test_convert_rounds_to_nearest() {
        assert_eq!(usd().convert(Decimal::new(1949, 2)), Some(19));
        assert_eq!(usd().convert(Decimal::new(1950, 2)), Some(20));
        assert_eq!(usd().convert(Decimal::new(1951, 2)), Some(20));
    }

    #[test]
    fn test_convert_applies_rate() {
        let eur = DisplayCurrency::new(CurrencyCode::EUR, Decimal::new(92, 2)).unwrap();
        // 250.00 * 0.92 = 230.00
        assert_eq!(eur.convert(Decimal::new(25000, 2)), Some(230));
    }

    #[test]
    fn test_convert_rejects_negative() {
        assert_eq!(usd().convert(Decimal::new(-1, 0)), None);
        assert_eq!(usd().convert(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_rate_must_be_positive() {
        let err = DisplayCurrency::new(CurrencyCode::USD, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CurrencyError::NonPositiveRate(_)));
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(usd().format(0), "$0");
        assert_eq!(usd().format(999), "$999");
        assert_eq!(usd().format(1000), "$1,000");
        assert_eq!(usd().format(1_234_567), "$1,234,567");
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("inr".parse::<CurrencyCode>().unwrap(), CurrencyCode::INR);
        assert_eq!(" GBP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
