use std::{fmt, ops, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::core::error::ParseMoneyError;

pub const SMALLEST_UNITS_PER_WHOLE: i64 = 100;

/// Exact fixed-point amount of currency, counted in hundredths of
/// a whole unit. There is no floating point anywhere in here, so
/// every sum and difference is exact.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
    SerializeDisplay, DeserializeFromStr)]
pub struct Money {
    units: i64,
}

impl Money {
    pub const ZERO: Money = Money { units: 0 };

    /// Builds an amount from whole units and hundredths.
    ///
    /// The sign is not propagated: for negative amounts both parts
    /// must carry it, otherwise `from_units(-1, 15)` is `-0.85`
    /// rather than `-1.15`.
    pub const fn from_units(whole: i64, fractional: i64) -> Money {
        Money { units: whole * SMALLEST_UNITS_PER_WHOLE + fractional }
    }

    pub const fn from_smallest_unit(units: i64) -> Money {
        Money { units }
    }

    pub const fn from_whole(whole: i64) -> Money {
        Money::from_units(whole, 0)
    }

    /// Parses `[-][whole][.[fraction]]`, where the fraction has at
    /// most two digits and a single digit means tenths (`.1` is ten
    /// hundredths). Both parts may be empty.
    pub fn parse(text: &str) -> Result<Money, ParseMoneyError> {
        let (negative, magnitude) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text)
        };

        let (whole_text, fraction_text) = match magnitude.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (magnitude, None)
        };

        let whole = Money::parse_digits(whole_text)
            .ok_or_else(|| ParseMoneyError::InvalidWhole(whole_text.to_owned()))?;

        let fraction = match fraction_text {
            None => 0,
            Some(digits) if digits.len() > 2 => return Err(ParseMoneyError::TooManyFractionalDigits),
            Some(digits) => {
                let value = Money::parse_digits(digits)
                    .ok_or_else(|| ParseMoneyError::InvalidFractional(digits.to_owned()))?;
                if digits.len() == 1 { value * 10 } else { value }
            }
        };

        let units = whole.checked_mul(SMALLEST_UNITS_PER_WHOLE)
            .and_then(|units| units.checked_add(fraction))
            .ok_or_else(|| ParseMoneyError::InvalidWhole(whole_text.to_owned()))?;

        let amount = Money::from_smallest_unit(units);
        return Ok(if negative { amount.negate() } else { amount });
    }

    /// Empty text counts as zero; anything but ASCII digits is rejected.
    fn parse_digits(digits: &str) -> Option<i64> {
        if digits.is_empty() {
            return Some(0);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub const fn smallest_units(&self) -> i64 {
        self.units
    }

    pub fn add(self, other: Money) -> Money {
        Money { units: self.units + other.units }
    }

    pub fn subtract(self, other: Money) -> Money {
        Money { units: self.units - other.units }
    }

    /// Saturates at the largest amount for the one value without a
    /// positive counterpart.
    pub fn negate(self) -> Money {
        Money { units: self.units.saturating_neg() }
    }

    pub fn abs(self) -> Money {
        if self.is_negative() { self.negate() } else { self }
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.units.checked_add(other.units).map(Money::from_smallest_unit)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.units.checked_sub(other.units).map(Money::from_smallest_unit)
    }

    pub fn checked_neg(self) -> Option<Money> {
        self.units.checked_neg().map(Money::from_smallest_unit)
    }

    pub fn is_greater_than(&self, other: Money) -> bool {
        self.units > other.units
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    pub fn is_positive(&self) -> bool {
        self.units > 0
    }

    /// # Panics
    ///
    /// Panics if `other` is zero.
    pub fn is_multiple_of(&self, other: Money) -> bool {
        self.units % other.units == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.units.unsigned_abs();
        let per_whole = SMALLEST_UNITS_PER_WHOLE as u64;
        write!(f, "{}{}.{:02}", sign, magnitude / per_whole, magnitude % per_whole)
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Money({})", self)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::add(self, rhs)
    }
}

impl ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        self.subtract(rhs)
    }
}

impl ops::Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        self.negate()
    }
}
