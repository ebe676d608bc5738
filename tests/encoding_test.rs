//! # Encoding Test Suite
//!
//! Round trips and concrete values for the numeric encodings the providers
//! are built on: digit decomposition, pairing functions, and the bit-level
//! float functions.

use dovetail::floats::{
    from_mantissa_and_exponent, from_ordered, predecessor, successor, to_mantissa_and_exponent,
    to_ordered,
};
use dovetail::ints::{
    bits, demux, digits, digits_padded, from_bits, from_digits, logarithmic_demux,
    logarithmic_mux, mux, square_root_demux, square_root_mux,
};
use dovetail::GenerationError;
use num_bigint::BigUint;

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

#[test]
fn test_digits_of_thirteen() {
    assert_eq!(digits(2, &big(13)), Ok(vec![1, 0, 1, 1]));
    assert_eq!(from_digits(2, &[1, 0, 1, 1]), Ok(big(13)));
    assert_eq!(bits(&big(13)), vec![true, false, true, true]);
    assert_eq!(from_bits(&[true, false, true, true]), big(13));
}

#[test]
fn test_digits_round_trip_in_several_bases() {
    for base in [2u32, 3, 10, 16, 1000] {
        for n in [0u64, 1, 99, 12_345, u64::MAX] {
            let ds = digits(base, &big(n)).unwrap();
            assert!(ds.last().map_or(true, |&d| d != 0));
            assert_eq!(from_digits(base, &ds), Ok(big(n)));
        }
    }
    assert_eq!(digits_padded(6, 2, &big(13)), Ok(vec![1, 0, 1, 1, 0, 0]));
}

#[test]
fn test_digit_argument_errors() {
    assert_eq!(digits(0, &big(1)), Err(GenerationError::InvalidBase(0)));
    assert_eq!(
        from_digits(2, &[1, 2]),
        Err(GenerationError::InvalidDigit { digit: 2, base: 2 })
    );
}

#[test]
fn test_logarithmic_pairing() {
    let n = logarithmic_mux(&big(7), 2).unwrap();
    assert_eq!(logarithmic_demux(&n), (big(7), 2));
    for x in 0..40u64 {
        for y in 0..12u32 {
            let n = logarithmic_mux(&big(x), y).unwrap();
            assert_eq!(logarithmic_demux(&n), (big(x), y));
        }
    }
}

#[test]
fn test_square_root_pairing_grows_like_square_root() {
    for n in 0..4096u64 {
        let (x, y) = square_root_demux(&big(n));
        assert_eq!(square_root_mux(&x, &y), big(n));
    }
    // After 2^12 steps y has seen four bits and x eight.
    let (x, y) = square_root_demux(&big(4095));
    assert_eq!((x, y), (big(255), big(15)));
}

#[test]
fn test_n_ary_pairing_round_trip() {
    let xs = vec![big(3), big(0), big(17), big(1)];
    let n = mux(&xs);
    assert_eq!(demux(4, &n), Ok(xs));
    assert_eq!(demux(0, &big(0)), Ok(vec![]));
    assert!(matches!(demux(0, &big(9)), Err(GenerationError::InvalidArity(_))));
}

#[test]
fn test_successor_of_zero_is_smallest_subnormal() {
    let smallest = f32::from_bits(1);
    assert_eq!(successor(0.0f32), Ok(smallest));
    assert_eq!(predecessor(smallest), Ok(0.0f32));
    assert_eq!(successor(f64::NEG_INFINITY), Ok(f64::MIN));
    assert!(matches!(successor(f64::INFINITY), Err(GenerationError::NoSuccessor(_))));
    assert_eq!(predecessor(f32::NAN), Err(GenerationError::NaN));
}

#[test]
fn test_ordered_representation_round_trip() {
    let values = [
        f32::NEG_INFINITY,
        -3.5,
        -f32::MIN_POSITIVE,
        0.0,
        f32::from_bits(7),
        1.0,
        f32::MAX,
        f32::INFINITY,
    ];
    for pair in values.windows(2) {
        assert!(to_ordered(pair[0]).unwrap() < to_ordered(pair[1]).unwrap());
    }
    for &v in &values {
        assert_eq!(from_ordered::<f32>(to_ordered(v).unwrap()), Ok(v));
    }
    assert_eq!(to_ordered(-0.0f32), to_ordered(0.0f32));
}

#[test]
fn test_mantissa_and_exponent_round_trip() {
    for &f in &[1.0f64, -0.1, 1e300, f64::MIN_POSITIVE, f64::from_bits(1), 12_345.678] {
        let (m, e) = to_mantissa_and_exponent(f).unwrap();
        assert!(m % 2 != 0);
        assert_eq!(from_mantissa_and_exponent::<f64>(m, e), Some(f));
    }
    assert_eq!(from_mantissa_and_exponent::<f64>(4, 0), None);
    assert_eq!(from_mantissa_and_exponent::<f64>(1, 1024), None);
}
