//! The `timespan` atom: a signed 64-bit nanosecond count with its own
//! textual form (`4ns`, `42s`, `10ms`, ...).
//!
//! Parsing/printing style follows the teacher's `FromStr`/`Display` pairs
//! elsewhere in the crate: explicit, staged, doc-tested.

use std::fmt;
use std::str::FromStr;

use crate::error::{self, Error};

const NS: i64 = 1;
const US: i64 = 1_000;
const MS: i64 = 1_000_000;
const S: i64 = 1_000_000_000;
const MIN: i64 = 60 * S;
const H: i64 = 3_600 * S;

/// Ordered largest-to-smallest so [`Timespan::fmt`] can pick the largest
/// unit that still divides the magnitude evenly.
const UNITS_LARGEST_FIRST: &[(i64, &str)] = &[(H, "h"), (MIN, "min"), (S, "s"), (MS, "ms"), (US, "us")];

/// A signed count of nanoseconds, the concrete type behind the `timespan`
/// [`Value`](crate::Value) variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Timespan(pub i64);

impl Timespan {
    #[inline]
    pub const fn from_nanos(ns: i64) -> Self {
        Self(ns)
    }

    #[inline]
    pub const fn as_nanos(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timespan {
    fn from(ns: i64) -> Self {
        Self(ns)
    }
}

/// Scales `magnitude` (given in `unit_ns` nanoseconds) to a nanosecond
/// count, failing with [`Error::IntegerOverflow`] if it doesn't fit in
/// `i64`.
pub(crate) fn scale_to_nanos(magnitude: f64, unit_ns: i64, literal: &str) -> Result<i64, Error> {
    let nanos = magnitude * unit_ns as f64;
    if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
        return error::IntegerOverflowSnafu { literal: literal.to_string() }.fail();
    }
    Ok(nanos.round() as i64)
}

impl fmt::Display for Timespan {
    /// Prints the magnitude followed by the largest unit that yields a
    /// whole number, preferring `ns` only as the fallback when no larger
    /// unit divides evenly.
    ///
    /// ```
    /// # use confval::Timespan;
    /// assert_eq!(Timespan::from_nanos(4).to_string(), "4ns");
    /// assert_eq!(Timespan::from_nanos(42_000_000_000).to_string(), "42s");
    /// assert_eq!(Timespan::from_nanos(10_000_000).to_string(), "10ms");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = self.0;
        if ns == 0 {
            return write!(f, "0ns");
        }
        for (unit_ns, suffix) in UNITS_LARGEST_FIRST {
            if ns % unit_ns == 0 {
                return write!(f, "{}{}", ns / unit_ns, suffix);
            }
        }
        write!(f, "{ns}ns")
    }
}

impl FromStr for Timespan {
    type Err = Error;

    /// Parses `<number><suffix>` where suffix is one of `ns us ms s min h`.
    ///
    /// ```
    /// # use confval::Timespan;
    /// # use ::core::str::FromStr;
    /// assert_eq!(Timespan::from_str("10ms").unwrap(), Timespan::from_nanos(10_000_000));
    /// assert!(Timespan::from_str("10").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::lex::scan_standalone_timespan(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_picks_largest_whole_unit() {
        assert_eq!(Timespan::from_nanos(0).to_string(), "0ns");
        assert_eq!(Timespan::from_nanos(4).to_string(), "4ns");
        assert_eq!(Timespan::from_nanos(1_500).to_string(), "1500ns");
        assert_eq!(Timespan::from_nanos(1_000).to_string(), "1us");
        assert_eq!(Timespan::from_nanos(10_000_000).to_string(), "10ms");
        assert_eq!(Timespan::from_nanos(42_000_000_000).to_string(), "42s");
        assert_eq!(Timespan::from_nanos(60_000_000_000).to_string(), "1min");
        assert_eq!(Timespan::from_nanos(3_600_000_000_000).to_string(), "1h");
    }

    #[test]
    fn from_str_round_trips_through_display() {
        for ns in [0i64, 4, 10_000_000, 42_000_000_000, 3_600_000_000_000] {
            let t = Timespan::from_nanos(ns);
            let printed = t.to_string();
            assert_eq!(printed.parse::<Timespan>().unwrap(), t, "round-trip of {printed}");
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn with_serde() {
        use serde_test::{assert_de_tokens, assert_ser_tokens, Token};

        let t = Timespan::from_nanos(10_000_000);

        assert_ser_tokens(&t, &[Token::NewtypeStruct { name: "Timespan" }, Token::I64(10_000_000)]);
        assert_de_tokens(&t, &[Token::NewtypeStruct { name: "Timespan" }, Token::I64(10_000_000)]);
    }
}
