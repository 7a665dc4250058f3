//! Money amounts in euro cents

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Largest amount accepted from user input: 999 999 999.99 €
pub const MAX_CENTS: u64 = 99_999_999_999;

/// A non-negative amount of money, stored as whole cents so sums are exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount {
    cents: u64,
}

impl Amount {
    /// Create an amount from whole cents
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Get the value in cents
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Parse a user-entered amount
    ///
    /// Accepts `12`, `12.5`, `12.50` and the German `12,50`. At most two
    /// fractional digits and at most [`MAX_CENTS`]; signs and thousands
    /// separators are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(Error::InvalidAmount("empty amount".to_string()));
        }

        let s = s.replace(',', ".");
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s.as_str(), ""),
        };

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !digits_only(whole) || !digits_only(frac) || (whole.is_empty() && frac.is_empty()) {
            return Err(Error::InvalidAmount(input.to_string()));
        }
        if frac.len() > 2 {
            return Err(Error::InvalidAmount(format!(
                "{}: at most two decimal places allowed",
                input
            )));
        }

        let euros: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| Error::InvalidAmount(input.to_string()))?
        };
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| Error::InvalidAmount(input.to_string()))? * 10,
            _ => frac.parse().map_err(|_| Error::InvalidAmount(input.to_string()))?,
        };

        euros
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .filter(|&cents| cents <= MAX_CENTS)
            .map(Self::from_cents)
            .ok_or_else(|| Error::InvalidAmount(format!("{}: too large", input)))
    }

    /// Exact sum, `None` on overflow
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.cents.checked_add(rhs.cents).map(Amount::from_cents)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

/// Two decimals followed by the euro sign, e.g. `14.50 €`
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} €", self.cents / 100, self.cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(Amount::parse("12").unwrap().cents(), 1200);
        assert_eq!(Amount::parse("12.5").unwrap().cents(), 1250);
        assert_eq!(Amount::parse("12.50").unwrap().cents(), 1250);
        assert_eq!(Amount::parse("12,05").unwrap().cents(), 1205);
        assert_eq!(Amount::parse(" 0.00 ").unwrap().cents(), 0);
        assert_eq!(Amount::parse(".5").unwrap().cents(), 50);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for input in ["", "-1", "1.234", "abc", "1.2.3", ".", "1 000"] {
            assert!(
                matches!(Amount::parse(input), Err(Error::InvalidAmount(_))),
                "expected rejection for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_sum_is_exact() {
        let total = Amount::parse("12.50").unwrap().checked_add(Amount::parse("2.00").unwrap()).unwrap();
        assert_eq!(total.cents(), 1450);
        assert_eq!(total.to_string(), "14.50 €");

        // 0.1 + 0.2 would drift as floating point
        let total = Amount::parse("0.10").unwrap().checked_add(Amount::parse("0.20").unwrap()).unwrap();
        assert_eq!(total.to_string(), "0.30 €");
    }

    #[test]
    fn test_parse_caps_at_max() {
        assert_eq!(Amount::parse("999999999.99").unwrap().cents(), MAX_CENTS);
        assert!(matches!(Amount::parse("1000000000"), Err(Error::InvalidAmount(_))));
        assert!(matches!(Amount::parse("99999999999999999999"), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Amount::from_cents(u64::MAX);
        assert_eq!(max.checked_add(Amount::from_cents(1)), None);
        assert_eq!(max.checked_add(Amount::default()), Some(max));
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Amount::from_cents(7).to_string(), "0.07 €");
        assert_eq!(Amount::from_cents(100).to_string(), "1.00 €");
    }
}
