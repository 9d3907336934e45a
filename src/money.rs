//! Fixed-point money in integer cents.
//!
//! Amounts arrive from forms as decimal strings (`"15"`, `"15.5"`, `"15.01"`)
//! and are rendered back with exactly two fractional digits.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    sqlx::Type,
)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct Money(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must be a non-negative number with at most two decimals: {0}")]
    Invalid(String),
    #[error("amount is too large: {0}")]
    Overflow(String),
}

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest amount accepted from a form: 99,999,999,999.99
    pub const MAX: Money = Money(9_999_999_999_999);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl Money {
    /// `None` when the sum would not fit.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMoneyError::Empty);
        }
        let invalid = || ParseMoneyError::Invalid(s.to_string());

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > 2 || !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseMoneyError::Overflow(s.to_string()))?
        };
        // "5" after the point means fifty cents
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Money)
            .filter(|amount| *amount <= Money::MAX)
            .ok_or_else(|| ParseMoneyError::Overflow(s.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<String> for Money {
    type Error = ParseMoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::from_cents(1050));
        assert_eq!("15.01".parse::<Money>().unwrap(), Money::from_cents(1501));
        assert_eq!(".99".parse::<Money>().unwrap(), Money::from_cents(99));
        assert_eq!(" 0 ".parse::<Money>().unwrap(), Money::ZERO);
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert!(matches!("-1".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!("1.001".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!("abc".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!(".".parse::<Money>(), Err(ParseMoneyError::Invalid(_))));
        assert!(matches!(
            "99999999999999999999".parse::<Money>(),
            Err(ParseMoneyError::Overflow(_))
        ));
    }

    #[test]
    fn caps_amounts_at_max() {
        assert_eq!("99999999999.99".parse::<Money>(), Ok(Money::MAX));
        assert!(matches!(
            "100000000000".parse::<Money>(),
            Err(ParseMoneyError::Overflow(_))
        ));
        assert!(matches!(
            "92233720368547758.07".parse::<Money>(),
            Err(ParseMoneyError::Overflow(_))
        ));
    }

    #[test]
    fn checked_add_reports_overflow() {
        assert_eq!(
            Money::from_cents(150).checked_add(Money::from_cents(1)),
            Some(Money::from_cents(151))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_cents(1501).to_string(), "15.01");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(999)).unwrap();
        assert_eq!(json, "\"9.99\"");
        let back: Money = serde_json::from_str("\"12.30\"").unwrap();
        assert_eq!(back, Money::from_cents(1230));
    }
}
