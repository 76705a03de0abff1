//! Decimal money amounts.
//!
//! The backend reports prices either as decimal strings (`"10.00"`) or as JSON
//! numbers (`20.5`). Amounts are always held as [`Decimal`] so that summing
//! line totals never picks up floating point drift.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a money amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The input string is empty.
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// Parse a decimal amount as sent by the backend.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`MoneyError::Empty`] for blank input and [`MoneyError::Invalid`]
/// when the input is not a decimal number.
///
/// ```
/// use orderain_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("10.00").ok(), Some(Decimal::new(1000, 2)));
/// assert!(parse_amount("ten").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, MoneyError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|_| MoneyError::Invalid(trimmed.to_owned()))
}

/// An amount paired with the currency icon the shop displays (e.g. `"$"`, `"Rs"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// Currency icon or symbol as configured on the shop.
    pub currency_icon: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_icon: impl Into<String>) -> Self {
        Self {
            amount,
            currency_icon: currency_icon.into(),
        }
    }

    /// Format for display with two decimal places (e.g., `$19.99`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_icon, format_amount(self.amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Sum of `amounts`, or `None` when a partial sum leaves the `Decimal` range.
///
/// ```
/// use orderain_core::checked_sum;
/// use rust_decimal::Decimal;
///
/// assert_eq!(checked_sum([Decimal::ONE, Decimal::TWO]), Some(Decimal::new(3, 0)));
/// assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
/// ```
#[must_use]
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Format an amount with exactly two decimal places, rounding half away from zero.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum(Vec::new()), Some(Decimal::ZERO));
        assert_eq!(
            checked_sum([Decimal::new(1050, 2), -Decimal::new(50, 2)]),
            Some(Decimal::new(10, 0))
        );
        assert_eq!(checked_sum([Decimal::MAX, Decimal::MAX]), None);
        assert_eq!(checked_sum([Decimal::MIN, -Decimal::ONE]), None);
    }

    #[test]
    fn test_parse_amount_accepts_decimal_strings() {
        assert_eq!(parse_amount(" 10.5 "), Ok(Decimal::new(105, 1)));
        assert_eq!(parse_amount("0.00"), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_parse_amount_rejects_blank_and_garbage() {
        assert_eq!(parse_amount("   "), Err(MoneyError::Empty));
        assert_eq!(
            parse_amount("abc"),
            Err(MoneyError::Invalid("abc".to_string()))
        );
    }

    #[test]
    fn test_display_pads_to_two_places() {
        let money = Money::new(Decimal::new(20, 0), "$");
        assert_eq!(money.display(), "$20.00");

        let money = Money::new(Decimal::new(19999, 3), "Rs");
        assert_eq!(money.to_string(), "Rs20.00");
    }

    #[test]
    fn test_format_amount_rounds_midpoint_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_amount(Decimal::new(-1005, 3)), "-1.01");
    }
}
