use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::EngineError;

/// Number of stored units per major unit.
pub const SCALE: i64 = 10_000;

/// Decimal places kept by [`Money`].
const DECIMALS: usize = 4;

/// Money amount represented as **integer ten-thousandths** of a major unit.
///
/// Use this type for **all** monetary values in the engine (donation amounts,
/// campaign goals, aggregated totals) to avoid floating-point drift when
/// summing hundreds of records. Four decimals cover currencies with three
/// minor digits (KWD, BHD) with one digit to spare.
///
/// The amount is currency-agnostic: the currency travels next to it on the
/// owning record.
///
/// Arithmetic saturates at the representable bounds instead of wrapping.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::from_raw(123_400);
/// assert_eq!(amount.raw(), 123_400);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 4 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap(), Money::major(10));
/// assert_eq!("10,125".parse::<Money>().unwrap().to_string(), "10.125");
/// assert!("12.34567".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(i64::MAX);

    /// Creates an amount from stored units (ten-thousandths).
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Creates an amount from whole major units (`Money::major(25)` is 25.00).
    #[must_use]
    pub const fn major(units: i64) -> Self {
        Self(units * SCALE)
    }

    /// Creates an amount from cents (`Money::cents(2550)` is 25.50).
    #[must_use]
    pub const fn cents(cents: i64) -> Self {
        Self(cents * (SCALE / 100))
    }

    /// Returns the stored value in ten-thousandths.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Value in major units, for presentation only.
    #[must_use]
    pub fn as_major(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// `self / whole * 100`, or `None` when `whole` is zero.
    #[must_use]
    pub fn percent_of(self, whole: Money) -> Option<f64> {
        if whole.is_zero() {
            return None;
        }
        Some(self.0 as f64 * 100.0 / whole.0 as f64)
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    fn from_major_f64(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount("amount is not finite".to_string()));
        }
        let scaled = value * SCALE as f64;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-4 {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }
        if rounded.abs() >= i64::MAX as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Money(rounded as i64))
    }
}

/// Prints at least two decimals, more only when they are significant:
/// `25.50`, `10.125`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / SCALE as u64;
        let frac = format!("{:04}", abs % SCALE as u64);
        let frac = frac.trim_end_matches('0');
        write!(f, "{sign}{units}.{frac:0<2}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string in major units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 4 fractional digits (rejects `12.34567`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let frac: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > DECIMALS {
                    return Err(EngineError::InvalidAmount("too many decimals".to_string()));
                }
                format!("{frac:0<width$}", width = DECIMALS)
                    .parse::<i64>()
                    .map_err(|_| invalid())?
            }
        };

        let total = units
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

/// On the wire amounts are plain JSON numbers in major units (`25.5`), the
/// way the dashboard datasets store them. Decimal strings are accepted too.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % SCALE == 0 {
            serializer.serialize_i64(self.0 / SCALE)
        } else {
            serializer.serialize_f64(self.as_major())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Int(units) => units
                .checked_mul(SCALE)
                .map(Money)
                .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string())),
            Raw::Float(value) => Money::from_major_f64(value),
            Raw::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
