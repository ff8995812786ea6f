//! Fixed-point decimals with exactly two fractional digits.
//!
//! Travel times, accumulated costs, preparation times and coordinates are all
//! carried as [`Fixed`] values so that rounding is reproducible across
//! platforms. Every conversion from floating point and every division rounds
//! half-to-even.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use thiserror::Error;

/// Number of hundredths in one unit.
const SCALE: i64 = 100;

/// Magnitude above which scaled floating-point input no longer fits an `i64`.
const F64_LIMIT: f64 = 9.0e18;

/// Longest digit run accepted by [`Fixed::from_str`] before overflow checks.
const MAX_PARSE_DIGITS: usize = 30;

/// A signed decimal with two fractional digits, stored as hundredths.
///
/// # Examples
/// ```
/// use courier_core::Fixed;
///
/// let distance: Fixed = "111.19".parse()?;
/// let speed = Fixed::from_int(20)?;
/// assert_eq!(distance.checked_div(speed)?.to_string(), "5.56");
/// # Ok::<(), courier_core::FixedError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

/// Errors raised while constructing or combining [`Fixed`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedError {
    /// A floating-point input was NaN or infinite.
    #[error("value is not a finite number")]
    NonFinite,
    /// The value does not fit the fixed-point range.
    #[error("value is outside the fixed-point range")]
    Overflow,
    /// A division by zero was requested.
    #[error("division by zero")]
    DivisionByZero,
    /// A decimal literal could not be parsed.
    #[error("invalid decimal literal {input:?}")]
    Parse {
        /// The rejected input.
        input: String,
    },
}

impl Fixed {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Construct a value from a raw count of hundredths.
    ///
    /// # Examples
    /// ```
    /// use courier_core::Fixed;
    ///
    /// assert_eq!(Fixed::from_hundredths(556).to_string(), "5.56");
    /// ```
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Construct a whole number.
    pub const fn from_int(value: i64) -> Result<Self, FixedError> {
        match value.checked_mul(SCALE) {
            Some(hundredths) => Ok(Self(hundredths)),
            None => Err(FixedError::Overflow),
        }
    }

    /// Round a floating-point value half-to-even onto two fractional digits.
    ///
    /// # Examples
    /// ```
    /// use courier_core::Fixed;
    ///
    /// assert_eq!(Fixed::from_f64(0.125)?.to_string(), "0.12");
    /// assert_eq!(Fixed::from_f64(0.375)?.to_string(), "0.38");
    /// # Ok::<(), courier_core::FixedError>(())
    /// ```
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        reason = "quantising a finite, range-checked float onto hundredths"
    )]
    pub fn from_f64(value: f64) -> Result<Self, FixedError> {
        if !value.is_finite() {
            return Err(FixedError::NonFinite);
        }
        let scaled = (value * 100.0).round_ties_even();
        if scaled.abs() >= F64_LIMIT {
            return Err(FixedError::Overflow);
        }
        Ok(Self(scaled as i64))
    }

    /// Return the raw count of hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Convert to a floating-point value.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "trigonometry needs floating-point inputs"
    )]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the value is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether the value is strictly less than zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Add two values, failing on overflow.
    pub const fn checked_add(self, other: Self) -> Result<Self, FixedError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(FixedError::Overflow),
        }
    }

    /// Divide by `divisor`, rounding the quotient half-to-even onto two digits.
    ///
    /// The division is exact integer arithmetic, so the result never depends
    /// on binary floating-point behaviour.
    ///
    /// # Examples
    /// ```
    /// use courier_core::Fixed;
    ///
    /// let half_cent = Fixed::from_hundredths(1).checked_div(Fixed::from_hundredths(200))?;
    /// assert_eq!(half_cent, Fixed::ZERO);
    /// let three_halves = Fixed::from_hundredths(3).checked_div(Fixed::from_hundredths(200))?;
    /// assert_eq!(three_halves, Fixed::from_hundredths(2));
    /// # Ok::<(), courier_core::FixedError>(())
    /// ```
    pub fn checked_div(self, divisor: Self) -> Result<Self, FixedError> {
        if divisor.0 == 0 {
            return Err(FixedError::DivisionByZero);
        }
        let numerator = i128::from(self.0)
            .checked_mul(i128::from(SCALE))
            .ok_or(FixedError::Overflow)?;
        let quotient =
            div_round_half_even(numerator, i128::from(divisor.0)).ok_or(FixedError::Overflow)?;
        i64::try_from(quotient)
            .map(Self)
            .map_err(|_| FixedError::Overflow)
    }
}

/// Integer division rounding half-to-even; `None` on overflow or zero divisor.
fn div_round_half_even(numerator: i128, denominator: i128) -> Option<i128> {
    let (numerator, denominator) = if denominator < 0 {
        (numerator.checked_neg()?, denominator.checked_neg()?)
    } else {
        (numerator, denominator)
    };
    let quotient = numerator.checked_div_euclid(denominator)?;
    let remainder = numerator.checked_rem_euclid(denominator)?;
    let round_up = match remainder.checked_mul(2)?.cmp(&denominator) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => quotient & 1 != 0,
    };
    if round_up {
        quotient.checked_add(1)
    } else {
        Some(quotient)
    }
}

impl Add for Fixed {
    type Output = Self;

    /// Saturating addition; costs never wrap.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = SCALE.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude.div_euclid(scale),
            magnitude.rem_euclid(scale)
        )
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    /// Parse a decimal literal such as `"-12.5"` or `"111.195"`.
    ///
    /// Digits beyond the second fractional place round half-to-even.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FixedError::Parse {
            input: s.to_owned(),
        };
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        let digit_count = whole.len().saturating_add(fraction.len());
        if digit_count == 0 || digit_count > MAX_PARSE_DIGITS {
            return Err(invalid());
        }
        if !digits_only(whole) || !digits_only(fraction) {
            return Err(invalid());
        }

        let mantissa: i128 = format!("{whole}{fraction}")
            .parse()
            .map_err(|_| invalid())?;
        let exponent = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        let divisor = 10_i128.checked_pow(exponent).ok_or(FixedError::Overflow)?;
        let scaled = mantissa
            .checked_mul(i128::from(SCALE))
            .ok_or(FixedError::Overflow)?;
        let magnitude = div_round_half_even(scaled, divisor).ok_or(FixedError::Overflow)?;
        let signed = if negative { -magnitude } else { magnitude };
        i64::try_from(signed)
            .map(Self)
            .map_err(|_| FixedError::Overflow)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Fixed;

    impl Serialize for Fixed {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    struct FixedVisitor;

    impl Visitor<'_> for FixedVisitor {
        type Value = Fixed;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a decimal number or decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Fixed::from_f64(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Fixed::from_int(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            let whole = i64::try_from(v).map_err(E::custom)?;
            Fixed::from_int(whole).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Fixed {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(FixedVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.125, 12)]
    #[case(0.375, 38)]
    #[case(-0.125, -12)]
    #[case(111.194_926_644_558_73, 11_119)]
    #[case(0.0, 0)]
    fn from_f64_rounds_half_to_even(#[case] input: f64, #[case] hundredths: i64) {
        let value = Fixed::from_f64(input).expect("finite input");
        assert_eq!(value.hundredths(), hundredths);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn from_f64_rejects_non_finite(#[case] input: f64) {
        assert_eq!(Fixed::from_f64(input), Err(FixedError::NonFinite));
    }

    #[rstest]
    #[case(11_119, 2_000, 556)]
    #[case(1, 200, 0)]
    #[case(3, 200, 2)]
    #[case(5, 200, 2)]
    #[case(-3, 200, -2)]
    #[case(10_000, 300, 3_333)]
    fn division_rounds_half_to_even(
        #[case] dividend: i64,
        #[case] divisor: i64,
        #[case] expected: i64,
    ) {
        let quotient = Fixed::from_hundredths(dividend)
            .checked_div(Fixed::from_hundredths(divisor))
            .expect("non-zero divisor");
        assert_eq!(quotient.hundredths(), expected);
    }

    #[rstest]
    fn division_by_zero_is_an_error() {
        let err = Fixed::from_hundredths(1)
            .checked_div(Fixed::ZERO)
            .expect_err("zero divisor");
        assert_eq!(err, FixedError::DivisionByZero);
    }

    #[rstest]
    #[case("5.555", 556)]
    #[case("5.545", 554)]
    #[case("20", 2_000)]
    #[case("-0.05", -5)]
    #[case(".5", 50)]
    #[case("+1.1", 110)]
    fn parses_decimal_literals(#[case] input: &str, #[case] hundredths: i64) {
        let value: Fixed = input.parse().expect("valid literal");
        assert_eq!(value.hundredths(), hundredths);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.2.3")]
    #[case("-")]
    #[case("1e5")]
    fn rejects_malformed_literals(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Fixed>(),
            Err(FixedError::Parse { .. })
        ));
    }

    #[rstest]
    #[case(556, "5.56")]
    #[case(-5, "-0.05")]
    #[case(0, "0.00")]
    #[case(100, "1.00")]
    fn displays_two_fractional_digits(#[case] hundredths: i64, #[case] expected: &str) {
        assert_eq!(Fixed::from_hundredths(hundredths).to_string(), expected);
    }

    #[rstest]
    fn addition_saturates() {
        let sum = Fixed::from_hundredths(i64::MAX) + Fixed::from_hundredths(1);
        assert_eq!(sum.hundredths(), i64::MAX);
        assert_eq!(
            Fixed::from_hundredths(i64::MAX).checked_add(Fixed::from_hundredths(1)),
            Err(FixedError::Overflow)
        );
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_as_two_digit_string() {
        let json = serde_json::to_string(&Fixed::from_hundredths(556)).expect("serialise");
        assert_eq!(json, "\"5.56\"");
        let from_string: Fixed = serde_json::from_str("\"5.56\"").expect("string form");
        let from_number: Fixed = serde_json::from_str("5.555").expect("number form");
        let from_int: Fixed = serde_json::from_str("20").expect("integer form");
        assert_eq!(from_string.hundredths(), 556);
        assert_eq!(from_number.hundredths(), 556);
        assert_eq!(from_int.hundredths(), 2_000);
    }
}
