//! Strict monetary amounts.
//!
//! Amounts are whole numbers in the smallest display unit. At the boundary
//! an amount may arrive as a JSON integer or as a string of ASCII digits;
//! anything else (signs, fractions, separators, blanks) is rejected.
//! Amounts above [`Money::MAX`] are rejected as well.

use std::{fmt, str::FromStr};

use serde::{
  Deserialize, Deserializer, Serialize,
  de::{self, Visitor},
};

use crate::{Error, Result};

/// A non-negative amount of money.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
  pub const ZERO: Self = Self(0);

  /// One trillion units.
  pub const MAX: Self = Self(1_000_000_000_000);

  pub fn new(amount: i64) -> Result<Self> {
    if amount < 0 {
      return Err(Error::validation(format!(
        "amount must not be negative, got {amount}"
      )));
    }
    if amount > Self::MAX.0 {
      return Err(Error::validation(format!(
        "amount must not exceed {}, got {amount}",
        Self::MAX
      )));
    }
    Ok(Self(amount))
  }

  pub const fn get(self) -> i64 { self.0 }

  pub const fn is_zero(self) -> bool { self.0 == 0 }

  /// Parse a string of ASCII digits.
  pub fn parse(s: &str) -> Result<Self> {
    if s.is_empty() {
      return Err(Error::validation("amount must not be empty"));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(Error::validation(format!(
        "amount must be a whole non-negative number, got {s:?}"
      )));
    }
    let amount = s
      .parse::<i64>()
      .map_err(|_| Error::validation(format!("amount out of range: {s}")))?;
    Self::new(amount)
  }
}

impl FromStr for Money {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl<'de> Deserialize<'de> for Money {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct MoneyVisitor;

    impl Visitor<'_> for MoneyVisitor {
      type Value = Money;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative whole amount as an integer or digit string")
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Money, E> {
        let amount =
          i64::try_from(v).map_err(|_| E::custom(format!("amount out of range: {v}")))?;
        Money::new(amount).map_err(E::custom)
      }

      fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Money, E> {
        Money::new(v).map_err(E::custom)
      }

      fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Money, E> {
        Err(E::custom(format!(
          "amount must be a whole number, got {v}"
        )))
      }

      fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Money, E> {
        Money::parse(v).map_err(E::custom)
      }
    }

    deserializer.deserialize_any(MoneyVisitor)
  }
}
