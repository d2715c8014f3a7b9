// src/money.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

pub type AmountValue = i64;

/// A wallet or price amount stored as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    cents: AmountValue,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount arithmetic overflowed")]
    Overflow,

    #[error("Invalid amount: {0}")]
    Parse(String),
}

impl Amount {
    pub const ZERO: Amount = Amount { cents: 0 };

    pub fn from_cents(cents: AmountValue) -> Self {
        Amount { cents }
    }

    /// Whole currency units for in-crate constants. Use `try_units` for anything else.
    pub(crate) const fn units(units: AmountValue) -> Self {
        Amount { cents: units * 100 }
    }

    /// Whole currency units, e.g. `Amount::try_units(15)` is 15.00.
    pub fn try_units(units: AmountValue) -> Result<Amount, MoneyError> {
        units
            .checked_mul(100)
            .map(Amount::from_cents)
            .ok_or(MoneyError::Overflow)
    }

    pub fn cents(&self) -> AmountValue {
        self.cents
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    pub fn checked_mul(self, factor: i64) -> Result<Amount, MoneyError> {
        self.cents
            .checked_mul(factor)
            .map(Amount::from_cents)
            .ok_or(MoneyError::Overflow)
    }

    fn from_decimal(value: f64) -> Result<Self, MoneyError> {
        let scaled = value * 100.0;
        if !scaled.is_finite() || scaled.abs() > AmountValue::MAX as f64 {
            return Err(MoneyError::Overflow);
        }
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(MoneyError::Parse(format!(
                "{} has more than two decimal places",
                value
            )));
        }
        Ok(Amount::from_cents(rounded as AmountValue))
    }
}

impl Add for Amount {
    type Output = Result<Amount, MoneyError>;

    fn add(self, other: Self) -> Self::Output {
        self.cents
            .checked_add(other.cents)
            .map(Amount::from_cents)
            .ok_or(MoneyError::Overflow)
    }
}

impl Sub for Amount {
    type Output = Result<Amount, MoneyError>;

    fn sub(self, other: Self) -> Self::Output {
        self.cents
            .checked_sub(other.cents)
            .map(Amount::from_cents)
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Amount {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || fraction.len() > 2 || !all_digits(fraction) {
            return Err(MoneyError::Parse(s.to_string()));
        }

        let whole = whole
            .parse::<AmountValue>()
            .map_err(|_| MoneyError::Overflow)?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<AmountValue>().map_err(|_| MoneyError::Parse(s.to_string()))? * 10,
            _ => fraction.parse::<AmountValue>().map_err(|_| MoneyError::Parse(s.to_string()))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction_cents))
            .ok_or(MoneyError::Overflow)?;

        Ok(Amount::from_cents(if negative { -cents } else { cents }))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.cents as f64 / 100.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Number(value) => Amount::from_decimal(value),
            AmountRepr::Text(text) => Amount::from_str(&text),
        }
        .map_err(serde::de::Error::custom)
    }
}
