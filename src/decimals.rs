//! Canonical arbitrary-precision decimals.
//!
//! A decimal is `unscaled * 10^-scale`. The canonical form has no trailing
//! zero digit in `unscaled`, and zero is `(0, 0)`, so every numeric value has
//! exactly one canonical pair. Both providers generate canonical decimals
//! only, which keeps numerically equal values from repeating.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::iterables::Iter;

fn strip_trailing_zeros(mut unscaled: BigInt, mut scale: i64) -> (BigInt, i64) {
    if unscaled.is_zero() {
        return (unscaled, 0);
    }
    let ten = BigInt::from(10);
    loop {
        let (quotient, remainder) = unscaled.div_rem(&ten);
        if !remainder.is_zero() {
            return (unscaled, scale);
        }
        unscaled = quotient;
        scale -= 1;
    }
}

/// The canonical form of `d`.
pub fn canonicalize(d: &BigDecimal) -> BigDecimal {
    let (unscaled, scale) = d.as_bigint_and_exponent();
    let (unscaled, scale) = strip_trailing_zeros(unscaled, scale);
    BigDecimal::new(unscaled, scale)
}

pub fn is_canonical(d: &BigDecimal) -> bool {
    let (unscaled, scale) = d.as_bigint_and_exponent();
    if unscaled.is_zero() {
        return scale == 0;
    }
    !(&unscaled % 10u32).is_zero()
}

/// Builds the decimal for a canonical `(unscaled, scale)` pair and rejects
/// every other pair, so mapping over all pairs hits each value once.
pub fn from_canonical_pair(unscaled: BigInt, scale: i64) -> Option<BigDecimal> {
    if unscaled.is_zero() {
        return if scale == 0 {
            Some(BigDecimal::zero())
        } else {
            None
        };
    }
    if (&unscaled % 10u32).is_zero() {
        return None;
    }
    Some(BigDecimal::new(unscaled, scale))
}

/// The scale of the canonical form of `d`.
pub fn canonical_scale(d: &BigDecimal) -> i64 {
    canonicalize(d).as_bigint_and_exponent().1
}

/// `d * 10^scale`, exact when `scale` is at least `canonical_scale(d)`.
pub fn unscaled_at(d: &BigDecimal, scale: i64) -> BigInt {
    d.with_scale(scale).as_bigint_and_exponent().0
}

/// The smallest scale at which both bounds are exact.
pub fn common_scale(a: &BigDecimal, b: &BigDecimal) -> i64 {
    canonical_scale(a).max(canonical_scale(b))
}

/// The canonical decimals in `[a, b]` whose canonical scale is exactly
/// `scale`. At the lowest level (`first`), every multiple of `10^-scale` in
/// the interval is included instead, since coarser values belong there.
pub fn precision_level(a: &BigDecimal, b: &BigDecimal, scale: i64, first: bool) -> Iter<BigDecimal> {
    let low = unscaled_at(a, scale);
    let high = unscaled_at(b, scale);
    let mut k = low;
    Box::new(std::iter::from_fn(move || loop {
        if k > high {
            return None;
        }
        let current = k.clone();
        k += 1;
        if first || !(&current % 10u32).is_zero() {
            return Some(canonicalize(&BigDecimal::new(current, scale)));
        }
    }))
}

/// Every canonical decimal in `[a, b]`, level by level in increasing
/// precision. Infinite whenever `a < b`.
pub fn range_by_precision(a: BigDecimal, b: BigDecimal) -> Iter<BigDecimal> {
    if a > b {
        return Box::new(std::iter::empty());
    }
    if a == b {
        return Box::new(std::iter::once(canonicalize(&a)));
    }
    let start = common_scale(&a, &b);
    Box::new((start..).flat_map(move |scale| precision_level(&a, &b, scale, scale == start)))
}

pub fn abs(d: &BigDecimal) -> BigDecimal {
    if d.is_negative() {
        -d
    } else {
        d.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_canonicalize() {
        let d = canonicalize(&BigDecimal::new(BigInt::from(1500), 3));
        assert_eq!(d.as_bigint_and_exponent(), (BigInt::from(15), 1));
        let zero = canonicalize(&BigDecimal::new(BigInt::from(0), 7));
        assert_eq!(zero.as_bigint_and_exponent(), (BigInt::from(0), 0));
        let hundred = canonicalize(&dec("100"));
        assert_eq!(hundred.as_bigint_and_exponent(), (BigInt::from(1), -2));
        assert!(is_canonical(&hundred));
        assert!(!is_canonical(&BigDecimal::new(BigInt::from(10), 0)));
    }

    #[test]
    fn test_negative_trailing_zeros() {
        assert!(!is_canonical(&BigDecimal::new(BigInt::from(-120), 2)));
        assert!(is_canonical(&BigDecimal::new(BigInt::from(-12), 1)));
        let d = canonicalize(&BigDecimal::new(BigInt::from(-4000), 1));
        assert_eq!(d.as_bigint_and_exponent(), (BigInt::from(-4), -2));
    }

    #[test]
    fn test_from_canonical_pair() {
        assert_eq!(from_canonical_pair(BigInt::from(15), 1), Some(dec("1.5")));
        assert_eq!(from_canonical_pair(BigInt::from(0), 0), Some(dec("0")));
        assert_eq!(from_canonical_pair(BigInt::from(0), 1), None);
        assert_eq!(from_canonical_pair(BigInt::from(20), 0), None);
    }

    #[test]
    fn test_range_by_precision() {
        let xs: Vec<BigDecimal> = range_by_precision(dec("1"), dec("2")).take(4).collect();
        assert_eq!(xs, vec![dec("1"), dec("2"), dec("1.1"), dec("1.2")]);

        let xs: Vec<BigDecimal> = range_by_precision(dec("0.5"), dec("1")).take(7).collect();
        assert_eq!(
            xs,
            vec![dec("0.5"), dec("0.6"), dec("0.7"), dec("0.8"), dec("0.9"), dec("1"), dec("0.51")]
        );
        assert!(xs.iter().all(is_canonical));
    }

    #[test]
    fn test_degenerate_ranges() {
        let xs: Vec<BigDecimal> = range_by_precision(dec("3.00"), dec("3")).collect();
        assert_eq!(xs, vec![dec("3")]);
        assert_eq!(range_by_precision(dec("5"), dec("3")).count(), 0);
    }
}
