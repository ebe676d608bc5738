// IEEE 754 bit-level encodings for enumeration.
// This module maps floats of every supported width (16, 32 and 64-bit) to
// an ordered integer representation, steps through adjacent representable
// values, and splits finite values into an odd mantissa and a binary
// exponent.

use std::fmt::{Debug, Display};

use half::f16;

use crate::error::{GenerationError, Result};

// Float width enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    Width16,
    Width32,
    Width64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::Width16 => 16,
            FloatWidth::Width32 => 32,
            FloatWidth::Width64 => 64,
        }
    }

    pub fn exponent_bits(self) -> u32 {
        match self {
            FloatWidth::Width16 => 5,
            FloatWidth::Width32 => 8,
            FloatWidth::Width64 => 11,
        }
    }

    pub fn mantissa_bits(self) -> u32 {
        match self {
            FloatWidth::Width16 => 10,
            FloatWidth::Width32 => 23,
            FloatWidth::Width64 => 52,
        }
    }

    pub fn bias(self) -> i32 {
        match self {
            FloatWidth::Width16 => 15,
            FloatWidth::Width32 => 127,
            FloatWidth::Width64 => 1023,
        }
    }

    /// Significant bits of a normal value, counting the implicit one.
    pub fn precision(self) -> u32 {
        self.mantissa_bits() + 1
    }

    pub fn max_exponent(self) -> u32 {
        (1 << self.exponent_bits()) - 1
    }

    pub fn mantissa_mask(self) -> u64 {
        (1u64 << self.mantissa_bits()) - 1
    }

    pub fn sign_mask(self) -> u64 {
        1u64 << (self.bits() - 1)
    }

    pub fn magnitude_mask(self) -> u64 {
        self.sign_mask() - 1
    }

    pub fn infinity_bits(self) -> u64 {
        u64::from(self.max_exponent()) << self.mantissa_bits()
    }

    /// The one NaN bit pattern the providers ever produce: quiet, positive,
    /// empty payload.
    pub fn canonical_nan_bits(self) -> u64 {
        self.infinity_bits() | (1u64 << (self.mantissa_bits() - 1))
    }

    /// Binary exponent of the smallest positive subnormal.
    pub fn min_binary_exponent(self) -> i32 {
        1 - self.bias() - self.mantissa_bits() as i32
    }

    /// Binary exponent of the largest finite power of two.
    pub fn max_binary_exponent(self) -> i32 {
        self.bias()
    }

    pub fn is_nan_bits(self, bits: u64) -> bool {
        (bits & self.magnitude_mask()) > self.infinity_bits()
    }

    pub fn is_finite_bits(self, bits: u64) -> bool {
        (bits & self.magnitude_mask()) < self.infinity_bits()
    }
}

/// Floating-point types the providers can enumerate and sample.
pub trait PrimitiveFloat: Copy + PartialOrd + Debug + Display + 'static {
    const WIDTH: FloatWidth;

    fn to_bits_u64(self) -> u64;

    /// Reinterprets the low `WIDTH.bits()` bits of `bits`.
    fn from_bits_u64(bits: u64) -> Self;

    fn to_f64(self) -> f64;

    fn canonical_nan() -> Self {
        Self::from_bits_u64(Self::WIDTH.canonical_nan_bits())
    }

    fn positive_zero() -> Self {
        Self::from_bits_u64(0)
    }

    fn is_nan_value(self) -> bool {
        Self::WIDTH.is_nan_bits(self.to_bits_u64())
    }

    fn is_finite_value(self) -> bool {
        Self::WIDTH.is_finite_bits(self.to_bits_u64())
    }

    fn is_negative_zero(self) -> bool {
        self.to_bits_u64() == Self::WIDTH.sign_mask()
    }

    /// Negation by sign-bit flip, exact for every value.
    fn negate(self) -> Self {
        Self::from_bits_u64(self.to_bits_u64() ^ Self::WIDTH.sign_mask())
    }
}

impl PrimitiveFloat for f16 {
    const WIDTH: FloatWidth = FloatWidth::Width16;

    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_bits_u64(bits: u64) -> Self {
        f16::from_bits(bits as u16)
    }

    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
}

impl PrimitiveFloat for f32 {
    const WIDTH: FloatWidth = FloatWidth::Width32;

    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }

    fn from_bits_u64(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl PrimitiveFloat for f64 {
    const WIDTH: FloatWidth = FloatWidth::Width64;

    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }

    fn from_bits_u64(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Largest ordered representation of a width; it belongs to +infinity.
pub fn max_ordered<F: PrimitiveFloat>() -> i64 {
    F::WIDTH.infinity_bits() as i64
}

/// Maps a non-NaN float to an integer with the same ordering. Both zeros
/// map to 0.
pub fn to_ordered<F: PrimitiveFloat>(f: F) -> Result<i64> {
    let width = F::WIDTH;
    let bits = f.to_bits_u64();
    if width.is_nan_bits(bits) {
        return Err(GenerationError::NaN);
    }
    let magnitude = (bits & width.magnitude_mask()) as i64;
    if bits & width.sign_mask() != 0 {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

/// Inverse of [`to_ordered`]. Zero maps back to positive zero.
pub fn from_ordered<F: PrimitiveFloat>(ordered: i64) -> Result<F> {
    let width = F::WIDTH;
    let magnitude = ordered.unsigned_abs();
    if magnitude > width.infinity_bits() {
        return Err(GenerationError::OrderedRepresentationOutOfRange(ordered));
    }
    if ordered < 0 {
        Ok(F::from_bits_u64(magnitude | width.sign_mask()))
    } else {
        Ok(F::from_bits_u64(magnitude))
    }
}

/// Like [`to_ordered`] but keeps the zeros apart: every value with the sign
/// bit set moves down by one, so -0.0 is -1 and 0.0 is 0. Ranges over this
/// representation are contiguous and contain each zero at most once.
pub fn to_signed_zero_ordered<F: PrimitiveFloat>(f: F) -> Result<i64> {
    let ordered = to_ordered(f)?;
    if f.to_bits_u64() & F::WIDTH.sign_mask() != 0 {
        Ok(ordered - 1)
    } else {
        Ok(ordered)
    }
}

/// Inverse of [`to_signed_zero_ordered`].
pub fn from_signed_zero_ordered<F: PrimitiveFloat>(ordered: i64) -> Result<F> {
    if ordered >= 0 {
        return from_ordered(ordered);
    }
    let width = F::WIDTH;
    let magnitude = (ordered + 1).unsigned_abs();
    if magnitude > width.infinity_bits() {
        return Err(GenerationError::OrderedRepresentationOutOfRange(ordered));
    }
    Ok(F::from_bits_u64(magnitude | width.sign_mask()))
}

/// The next representable value above `f`.
pub fn successor<F: PrimitiveFloat>(f: F) -> Result<F> {
    let ordered = to_ordered(f)?;
    if ordered == max_ordered::<F>() {
        return Err(GenerationError::NoSuccessor(f.to_string()));
    }
    from_ordered(ordered + 1)
}

/// The next representable value below `f`.
pub fn predecessor<F: PrimitiveFloat>(f: F) -> Result<F> {
    let ordered = to_ordered(f)?;
    if ordered == -max_ordered::<F>() {
        return Err(GenerationError::NoPredecessor(f.to_string()));
    }
    from_ordered(ordered - 1)
}

/// Splits a finite value into an odd mantissa and an exponent with
/// `f == mantissa * 2^exponent`. Both zeros give `(0, 0)`; infinities and
/// NaN give `None`.
pub fn to_mantissa_and_exponent<F: PrimitiveFloat>(f: F) -> Option<(i64, i32)> {
    let width = F::WIDTH;
    let bits = f.to_bits_u64();
    if !width.is_finite_bits(bits) {
        return None;
    }
    let magnitude = bits & width.magnitude_mask();
    if magnitude == 0 {
        return Some((0, 0));
    }
    let exponent_field = magnitude >> width.mantissa_bits();
    let fraction = magnitude & width.mantissa_mask();
    let (mantissa, exponent) = if exponent_field == 0 {
        (fraction, width.min_binary_exponent())
    } else {
        (
            fraction | (1u64 << width.mantissa_bits()),
            exponent_field as i32 - width.bias() - width.mantissa_bits() as i32,
        )
    };
    let shift = mantissa.trailing_zeros();
    let mantissa = (mantissa >> shift) as i64;
    let exponent = exponent + shift as i32;
    if bits & width.sign_mask() != 0 {
        Some((-mantissa, exponent))
    } else {
        Some((mantissa, exponent))
    }
}

/// Rebuilds `mantissa * 2^exponent` exactly, or `None` when the pair is not
/// the canonical decomposition of a representable value (even mantissa,
/// too many significant bits, or magnitude out of range).
pub fn from_mantissa_and_exponent<F: PrimitiveFloat>(mantissa: i64, exponent: i32) -> Option<F> {
    let width = F::WIDTH;
    if mantissa == 0 {
        return if exponent == 0 {
            Some(F::positive_zero())
        } else {
            None
        };
    }
    if mantissa % 2 == 0 {
        return None;
    }
    let magnitude = mantissa.unsigned_abs();
    let length = 64 - magnitude.leading_zeros();
    if length > width.precision() {
        return None;
    }
    let exponent = i64::from(exponent);
    let mantissa_bits = i64::from(width.mantissa_bits());
    let bias = i64::from(width.bias());
    let top = exponent + i64::from(length) - 1;
    let magnitude_bits = if top > bias {
        return None;
    } else if top >= 1 - bias {
        let biased = (top + bias) as u64;
        let fraction = (magnitude << (mantissa_bits - (i64::from(length) - 1))) & width.mantissa_mask();
        (biased << mantissa_bits) | fraction
    } else {
        let shift = exponent - i64::from(width.min_binary_exponent());
        if shift < 0 {
            return None;
        }
        magnitude << shift
    };
    let bits = if mantissa < 0 {
        magnitude_bits | width.sign_mask()
    } else {
        magnitude_bits
    };
    let f = F::from_bits_u64(bits);
    debug_assert_eq!(to_mantissa_and_exponent(f), Some((mantissa, exponent as i32)));
    Some(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_constants() {
        assert_eq!(FloatWidth::Width32.infinity_bits(), f32::INFINITY.to_bits() as u64);
        assert_eq!(FloatWidth::Width64.infinity_bits(), f64::INFINITY.to_bits());
        assert_eq!(FloatWidth::Width32.canonical_nan_bits(), f32::NAN.to_bits() as u64);
        assert_eq!(FloatWidth::Width64.canonical_nan_bits(), f64::NAN.to_bits());
        assert_eq!(FloatWidth::Width16.canonical_nan_bits(), f16::NAN.to_bits() as u64);
        assert_eq!(FloatWidth::Width32.min_binary_exponent(), -149);
        assert_eq!(FloatWidth::Width64.min_binary_exponent(), -1074);
        assert_eq!(FloatWidth::Width16.min_binary_exponent(), -24);
    }

    #[test]
    fn test_successor_of_zero() {
        assert_eq!(successor(0.0f32).unwrap().to_bits(), 1);
        assert_eq!(successor(-0.0f32).unwrap().to_bits(), 1);
        assert_eq!(predecessor(f32::from_bits(1)).unwrap().to_bits(), 0);
        assert_eq!(predecessor(0.0f64).unwrap(), -f64::from_bits(1));
    }

    #[test]
    fn test_successor_at_boundaries() {
        assert_eq!(successor(f32::NEG_INFINITY), Ok(f32::MIN));
        assert_eq!(successor(f32::MAX), Ok(f32::INFINITY));
        assert_eq!(predecessor(f64::INFINITY), Ok(f64::MAX));
        assert_eq!(predecessor(f64::MIN), Ok(f64::NEG_INFINITY));
        assert_eq!(successor(1.0f64), Ok(1.0 + f64::EPSILON));
        assert!(matches!(successor(f32::INFINITY), Err(GenerationError::NoSuccessor(_))));
        assert!(matches!(predecessor(f32::NEG_INFINITY), Err(GenerationError::NoPredecessor(_))));
        assert_eq!(successor(f64::NAN), Err(GenerationError::NaN));
        assert_eq!(predecessor(f32::NAN), Err(GenerationError::NaN));
    }

    #[test]
    fn test_ordered_representation() {
        assert_eq!(to_ordered(0.0f32), Ok(0));
        assert_eq!(to_ordered(-0.0f32), Ok(0));
        assert_eq!(to_ordered(f32::from_bits(1)), Ok(1));
        assert_eq!(to_ordered(-f32::from_bits(1)), Ok(-1));
        assert_eq!(to_ordered(f32::INFINITY), Ok(max_ordered::<f32>()));
        assert_eq!(to_ordered(f32::NAN), Err(GenerationError::NaN));

        let too_far = max_ordered::<f32>() + 1;
        assert_eq!(
            from_ordered::<f32>(too_far),
            Err(GenerationError::OrderedRepresentationOutOfRange(too_far))
        );
        assert_eq!(from_ordered::<f32>(-max_ordered::<f32>()), Ok(f32::NEG_INFINITY));
        assert!(from_ordered::<f64>(i64::MIN).is_err());
    }

    #[test]
    fn test_ordered_representation_is_monotone() {
        let values = [
            f64::NEG_INFINITY,
            f64::MIN,
            -1.5,
            -f64::MIN_POSITIVE,
            -f64::from_bits(1),
            0.0,
            f64::from_bits(1),
            1.0,
            f64::MAX,
            f64::INFINITY,
        ];
        for pair in values.windows(2) {
            assert!(to_ordered(pair[0]).unwrap() < to_ordered(pair[1]).unwrap());
        }
        for &v in &values {
            assert_eq!(from_ordered::<f64>(to_ordered(v).unwrap()), Ok(v));
        }
    }

    #[test]
    fn test_signed_zero_ordering() {
        assert_eq!(to_signed_zero_ordered(0.0f32), Ok(0));
        assert_eq!(to_signed_zero_ordered(-0.0f32), Ok(-1));
        assert_eq!(to_signed_zero_ordered(-f32::from_bits(1)), Ok(-2));
        assert!(from_signed_zero_ordered::<f32>(-1).unwrap().is_negative_zero());
        assert_eq!(from_signed_zero_ordered::<f32>(0).unwrap().to_bits(), 0);
        let lowest = to_signed_zero_ordered(f64::NEG_INFINITY).unwrap();
        assert_eq!(from_signed_zero_ordered::<f64>(lowest), Ok(f64::NEG_INFINITY));
        assert!(from_signed_zero_ordered::<f64>(lowest - 1).is_err());
    }

    #[test]
    fn test_mantissa_and_exponent() {
        assert_eq!(to_mantissa_and_exponent(1.0f32), Some((1, 0)));
        assert_eq!(to_mantissa_and_exponent(0.5f32), Some((1, -1)));
        assert_eq!(to_mantissa_and_exponent(6.0f32), Some((3, 1)));
        assert_eq!(to_mantissa_and_exponent(-0.75f64), Some((-3, -2)));
        assert_eq!(to_mantissa_and_exponent(f32::from_bits(1)), Some((1, -149)));
        assert_eq!(to_mantissa_and_exponent(f32::MAX), Some(((1 << 24) - 1, 104)));
        assert_eq!(to_mantissa_and_exponent(-0.0f32), Some((0, 0)));
        assert_eq!(to_mantissa_and_exponent(f32::INFINITY), None);
        assert_eq!(to_mantissa_and_exponent(f64::NAN), None);
    }

    #[test]
    fn test_from_mantissa_and_exponent() {
        assert_eq!(from_mantissa_and_exponent::<f32>(3, 1), Some(6.0));
        assert_eq!(from_mantissa_and_exponent::<f32>(-3, -2), Some(-0.75));
        assert_eq!(from_mantissa_and_exponent::<f32>(1, -149), Some(f32::from_bits(1)));
        assert_eq!(from_mantissa_and_exponent::<f32>(3, -149), Some(f32::from_bits(3)));
        assert_eq!(from_mantissa_and_exponent::<f32>((1 << 24) - 1, 104), Some(f32::MAX));
        assert_eq!(from_mantissa_and_exponent::<f64>(1, 1023), Some(2f64.powi(1023)));
        assert_eq!(from_mantissa_and_exponent::<f32>(0, 0), Some(0.0));

        assert_eq!(from_mantissa_and_exponent::<f32>(0, 3), None);
        assert_eq!(from_mantissa_and_exponent::<f32>(2, 0), None);
        assert_eq!(from_mantissa_and_exponent::<f32>(1, 128), None);
        assert_eq!(from_mantissa_and_exponent::<f32>(1, -150), None);
        assert_eq!(from_mantissa_and_exponent::<f32>((1 << 24) + 1, 0), None);
        assert_eq!(from_mantissa_and_exponent::<f32>(3, 127), None);
    }

    #[test]
    fn test_half_precision() {
        let one = f16::from_f32(1.0);
        assert_eq!(to_mantissa_and_exponent(one), Some((1, 0)));
        assert_eq!(successor(f16::MAX), Ok(f16::INFINITY));
        assert_eq!(from_mantissa_and_exponent::<f16>(1, -24), Some(f16::from_bits(1)));
        assert_eq!(to_ordered(f16::NEG_INFINITY), Ok(-0x7C00));
    }

    #[test]
    fn test_mantissa_round_trip_over_f16() {
        for bits in 0..=u16::MAX {
            let f = f16::from_bits(bits);
            if let Some((m, e)) = to_mantissa_and_exponent(f) {
                let back = from_mantissa_and_exponent::<f16>(m, e).unwrap();
                if f.is_negative_zero() {
                    assert_eq!(back.to_bits(), 0);
                } else {
                    assert_eq!(back.to_bits(), bits);
                }
            }
        }
    }
}
