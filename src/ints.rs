// Integer encodings for the enumeration layer.
// This module contains digit and bit decomposition of naturals and the
// bijective pairing functions ("mux"/"demux") that let one counter drive
// an enumeration of pairs, tuples and lists.
//
// Naturals are `BigUint` throughout, so a negative input to a
// naturals-only function cannot be expressed.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::num::NonZeroU32;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::error::{GenerationError, Result};

/// Largest `y` accepted by [`logarithmic_mux`].
pub const MAX_LOGARITHMIC_EXPONENT: u32 = i32::MAX as u32;

/// Fixed-width machine integers the providers can generate.
pub trait BoundedInteger: Copy + Ord + Hash + Debug + Display + 'static {
    const MIN: Self;
    const MAX: Self;
    const BITS: u32;
    const SIGNED: bool;

    fn to_i128(self) -> i128;

    /// Converts back from `i128`. The value must lie in `MIN..=MAX`.
    fn from_i128(value: i128) -> Self;
}

macro_rules! bounded_integer {
    ($($t:ty),*) => {
        $(
            impl BoundedInteger for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const BITS: u32 = <$t>::BITS;
                const SIGNED: bool = <$t>::MIN != 0;

                fn to_i128(self) -> i128 {
                    self as i128
                }

                fn from_i128(value: i128) -> Self {
                    debug_assert!(value >= Self::MIN as i128 && value <= Self::MAX as i128);
                    value as $t
                }
            }
        )*
    };
}

bounded_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Little-endian binary digits of `n`, without trailing zeros. Zero is the
/// empty sequence.
pub fn bits(n: &BigUint) -> Vec<bool> {
    (0..n.bits()).map(|i| n.bit(i)).collect()
}

/// Exactly `len` little-endian bits of `n`, truncating or zero-padding.
pub fn bits_padded(len: usize, n: &BigUint) -> Vec<bool> {
    (0..len as u64).map(|i| n.bit(i)).collect()
}

pub fn from_bits(bits: &[bool]) -> BigUint {
    let mut n = BigUint::zero();
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            n.set_bit(i as u64, true);
        }
    }
    n
}

fn check_base(base: u32) -> Result<()> {
    if base < 2 {
        Err(GenerationError::InvalidBase(base))
    } else {
        Ok(())
    }
}

/// Little-endian base-`base` digits of `n`, without trailing zeros.
pub fn digits(base: u32, n: &BigUint) -> Result<Vec<u32>> {
    check_base(base)?;
    let big_base = BigUint::from(base);
    let mut digits = Vec::new();
    let mut remaining = n.clone();
    while !remaining.is_zero() {
        let (quotient, digit) = remaining.div_rem(&big_base);
        // A remainder is always below base, so it fits in a u32.
        digits.push(digit.to_u32().unwrap_or_default());
        remaining = quotient;
    }
    Ok(digits)
}

/// Exactly `len` little-endian base-`base` digits of `n`, truncating or
/// zero-padding.
pub fn digits_padded(len: usize, base: u32, n: &BigUint) -> Result<Vec<u32>> {
    let mut digits = digits(base, n)?;
    digits.resize(len, 0);
    Ok(digits)
}

pub fn from_digits(base: u32, digits: &[u32]) -> Result<BigUint> {
    check_base(base)?;
    let mut n = BigUint::zero();
    for &digit in digits.iter().rev() {
        if digit >= base {
            return Err(GenerationError::InvalidDigit { digit, base });
        }
        n = n * base + digit;
    }
    Ok(n)
}

/// Bijection from pairs of naturals to naturals where `y` contributes
/// logarithmically: `((2x + 1) * 2^y) - 1`.
pub fn logarithmic_mux(x: &BigUint, y: u32) -> Result<BigUint> {
    if y > MAX_LOGARITHMIC_EXPONENT {
        return Err(GenerationError::InvalidBitLength(format!(
            "logarithmic exponent {} exceeds {}",
            y, MAX_LOGARITHMIC_EXPONENT
        )));
    }
    Ok((((x << 1u32) + 1u32) << y) - 1u32)
}

/// Inverse of [`logarithmic_mux`].
pub fn logarithmic_demux(n: &BigUint) -> (BigUint, u32) {
    let successor = n + 1u32;
    // successor is at least 1, so it has a lowest set bit.
    let y = successor.trailing_zeros().unwrap_or(0);
    let x = (successor >> y) >> 1u32;
    (x, y as u32)
}

/// A positive share known at compile time.
pub(crate) const fn share(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("bit shares are positive"),
    }
}

const ONE: NonZeroU32 = share(1);
const TWO: NonZeroU32 = share(2);

/// Rejects ratio pairings where either side gets no bits per round.
pub(crate) fn check_shares(x_share: u32, y_share: u32) -> Result<(NonZeroU32, NonZeroU32)> {
    match (NonZeroU32::new(x_share), NonZeroU32::new(y_share)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(GenerationError::InvalidRatio { x_share, y_share }),
    }
}

/// Interleaves the bits of several naturals. Each part contributes `share`
/// consecutive bits per round; earlier parts take the lower positions.
fn interleave_bits(parts: &[(&BigUint, NonZeroU32)]) -> BigUint {
    let rounds = parts
        .iter()
        .map(|(n, share)| {
            let share = u64::from(share.get());
            (n.bits() + share - 1) / share
        })
        .max()
        .unwrap_or(0);
    let mut result = BigUint::zero();
    let mut position = 0u64;
    for round in 0..rounds {
        for (n, share) in parts {
            let share = u64::from(share.get());
            for offset in 0..share {
                if n.bit(round * share + offset) {
                    result.set_bit(position, true);
                }
                position += 1;
            }
        }
    }
    result
}

fn deinterleave_bits(n: &BigUint, shares: &[NonZeroU32]) -> Vec<BigUint> {
    let mut parts = vec![BigUint::zero(); shares.len()];
    let mut filled = vec![0u64; shares.len()];
    let total = n.bits();
    let mut position = 0u64;
    while position < total {
        for (i, share) in shares.iter().enumerate() {
            for _ in 0..share.get() {
                if n.bit(position) {
                    parts[i].set_bit(filled[i], true);
                }
                filled[i] += 1;
                position += 1;
            }
        }
    }
    parts
}

pub(crate) fn interleave_pair(x_share: NonZeroU32, y_share: NonZeroU32, x: &BigUint, y: &BigUint) -> BigUint {
    interleave_bits(&[(y, y_share), (x, x_share)])
}

pub(crate) fn deinterleave_pair(x_share: NonZeroU32, y_share: NonZeroU32, n: &BigUint) -> (BigUint, BigUint) {
    let mut parts = deinterleave_bits(n, &[y_share, x_share]).into_iter();
    let y = parts.next().unwrap_or_default();
    let x = parts.next().unwrap_or_default();
    (x, y)
}

/// Bijection from pairs to naturals that gives `x` `x_share` bits for every
/// `y_share` bits of `y`. Within each round `y`'s bits sit below `x`'s.
/// Both shares must be positive.
pub fn ratio_mux(x_share: u32, y_share: u32, x: &BigUint, y: &BigUint) -> Result<BigUint> {
    let (x_share, y_share) = check_shares(x_share, y_share)?;
    Ok(interleave_pair(x_share, y_share, x, y))
}

/// Inverse of [`ratio_mux`].
pub fn ratio_demux(x_share: u32, y_share: u32, n: &BigUint) -> Result<(BigUint, BigUint)> {
    let (x_share, y_share) = check_shares(x_share, y_share)?;
    Ok(deinterleave_pair(x_share, y_share, n))
}

/// Interleaves the bits of `x` and `y` at a 2:1 ratio, so that as the result
/// grows `y` grows like the square root of `x`.
pub fn square_root_mux(x: &BigUint, y: &BigUint) -> BigUint {
    interleave_pair(TWO, ONE, x, y)
}

pub fn square_root_demux(n: &BigUint) -> (BigUint, BigUint) {
    deinterleave_pair(TWO, ONE, n)
}

/// Bijection from fixed-length lists of naturals to naturals, interleaving
/// bits round-robin. The last component takes the lowest bit of each round.
pub fn mux(xs: &[BigUint]) -> BigUint {
    let parts: Vec<(&BigUint, NonZeroU32)> = xs.iter().rev().map(|x| (x, ONE)).collect();
    interleave_bits(&parts)
}

/// Inverse of [`mux`] for lists of length `size`. Only zero demultiplexes
/// into the empty list.
pub fn demux(size: usize, n: &BigUint) -> Result<Vec<BigUint>> {
    if size == 0 {
        return if n.is_zero() {
            Ok(Vec::new())
        } else {
            Err(GenerationError::InvalidArity(n.to_string()))
        };
    }
    let mut parts = deinterleave_bits(n, &vec![ONE; size]);
    parts.reverse();
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_bits() {
        assert_eq!(bits(&big(0)), Vec::<bool>::new());
        assert_eq!(bits(&big(6)), vec![false, true, true]);
        assert_eq!(bits_padded(5, &big(6)), vec![false, true, true, false, false]);
        assert_eq!(bits_padded(2, &big(6)), vec![false, true]);
        assert_eq!(from_bits(&[false, true, true, false]), big(6));
    }

    #[test]
    fn test_digits_of_thirteen() {
        assert_eq!(digits(2, &big(13)), Ok(vec![1, 0, 1, 1]));
        assert_eq!(from_digits(2, &[1, 0, 1, 1]), Ok(big(13)));
    }

    #[test]
    fn test_digits_large_base() {
        let n = big(70_000);
        let ds = digits(65_536, &n).unwrap();
        assert_eq!(ds, vec![70_000 - 65_536, 1]);
        assert_eq!(from_digits(65_536, &ds), Ok(n));
        assert_eq!(digits(10, &big(0)), Ok(vec![]));
        assert_eq!(digits_padded(4, 10, &big(123)), Ok(vec![3, 2, 1, 0]));
        assert_eq!(digits_padded(2, 10, &big(123)), Ok(vec![3, 2]));
    }

    #[test]
    fn test_digit_errors() {
        assert_eq!(digits(1, &big(5)), Err(GenerationError::InvalidBase(1)));
        assert_eq!(
            from_digits(3, &[1, 3]),
            Err(GenerationError::InvalidDigit { digit: 3, base: 3 })
        );
    }

    #[test]
    fn test_logarithmic_mux() {
        assert_eq!(logarithmic_mux(&big(0), 0), Ok(big(0)));
        assert_eq!(logarithmic_mux(&big(7), 2), Ok(big(59)));
        assert_eq!(logarithmic_demux(&big(59)), (big(7), 2));
        for n in 0..500u64 {
            let (x, y) = logarithmic_demux(&big(n));
            assert_eq!(logarithmic_mux(&x, y), Ok(big(n)));
        }
        assert!(logarithmic_mux(&big(1), MAX_LOGARITHMIC_EXPONENT + 1).is_err());
    }

    #[test]
    fn test_square_root_mux_ratio() {
        // x takes two bits for every bit of y
        assert_eq!(square_root_demux(&big(0b111)), (big(0b11), big(0b1)));
        assert_eq!(square_root_demux(&big(0b001)), (big(0), big(1)));
        assert_eq!(square_root_demux(&big(0b010)), (big(1), big(0)));
        for n in 0..1000u64 {
            let (x, y) = square_root_demux(&big(n));
            assert_eq!(square_root_mux(&x, &y), big(n));
        }
    }

    #[test]
    fn test_ratio_mux_is_monotone() {
        for x in 0..20u64 {
            for y in 0..20u64 {
                let here = ratio_mux(3, 2, &big(x), &big(y)).unwrap();
                assert!(ratio_mux(3, 2, &big(x + 1), &big(y)).unwrap() > here);
                assert!(ratio_mux(3, 2, &big(x), &big(y + 1)).unwrap() > here);
            }
        }
    }

    #[test]
    fn test_ratio_rejects_zero_shares() {
        let error = GenerationError::InvalidRatio {
            x_share: 0,
            y_share: 1,
        };
        assert_eq!(ratio_mux(0, 1, &big(3), &big(1)), Err(error.clone()));
        assert_eq!(ratio_demux(0, 1, &big(5)), Err(error));
        assert!(ratio_demux(0, 0, &big(5)).is_err());
        assert!(ratio_mux(2, 0, &big(0), &big(0)).is_err());
        let (x, y) = ratio_demux(3, 2, &big(1234)).unwrap();
        assert_eq!(ratio_mux(3, 2, &x, &y), Ok(big(1234)));
    }

    #[test]
    fn test_n_ary_mux() {
        assert_eq!(mux(&[]), big(0));
        assert_eq!(demux(0, &big(0)), Ok(vec![]));
        assert!(demux(0, &big(1)).is_err());
        assert_eq!(demux(3, &big(1)), Ok(vec![big(0), big(0), big(1)]));
        assert_eq!(mux(&[big(1), big(0), big(0)]), big(4));
        for n in 0..300u64 {
            for size in 1..5 {
                let xs = demux(size, &big(n)).unwrap();
                assert_eq!(xs.len(), size);
                assert_eq!(mux(&xs), big(n));
            }
        }
    }

    #[test]
    fn test_bounded_integer_constants() {
        assert_eq!(<i8 as BoundedInteger>::MIN, -128);
        assert_eq!(<u16 as BoundedInteger>::BITS, 16);
        assert!(<i64 as BoundedInteger>::SIGNED);
        assert!(!<u64 as BoundedInteger>::SIGNED);
        assert_eq!(BoundedInteger::to_i128(u64::MAX), 18_446_744_073_709_551_615);
        assert_eq!(<i32 as BoundedInteger>::from_i128(-5), -5);
    }
}
