//! # Provider Contract Test Suite
//!
//! Properties that hold for every `IterableProvider`, run against both the
//! exhaustive and the random provider through one generic checker.

use std::collections::HashSet;

use bigdecimal::BigDecimal;
use dovetail::decimals::is_canonical;
use dovetail::{ExhaustiveProvider, IterableProvider, RandomProvider};
use num_bigint::BigInt;
use num_traits::Signed;

const N: usize = 300;

fn check_integers<P: IterableProvider>(p: &P) {
    assert!(p.naturals::<i32>().take(N).all(|x| x >= 0));
    assert!(p.positives::<u16>().take(N).all(|x| x > 0));
    assert!(p.negatives::<i64>().take(N).all(|x| x < 0));
    assert!(p.nonzero_integers::<i8>().take(N).all(|x| x != 0));
    assert!(p.range_up(100u8).take(N).all(|x| x >= 100));
    assert!(p.range_down(-100i16).take(N).all(|x| x <= -100));
    assert_eq!(p.range(9i32, 8).next(), None);
    assert!(p.range(7u64, 7).take(5).all(|x| x == 7));
}

fn check_big_integers<P: IterableProvider>(p: &P) {
    assert!(p.natural_big_integers().take(N).all(|n| !n.is_negative()));
    assert!(p.positive_big_integers().take(N).all(|n| n.is_positive()));
    assert!(p.negative_big_integers().take(N).all(|n| n.is_negative()));
    let a = BigInt::from(-17);
    assert!(p.big_integer_range_down(a.clone()).take(N).all(|n| n <= a));
    assert!(p
        .big_integer_range(BigInt::from(2), BigInt::from(4))
        .take(N)
        .all(|n| n >= BigInt::from(2) && n <= BigInt::from(4)));
}

fn check_characters<P: IterableProvider>(p: &P) {
    assert!(p.ascii_characters().take(N).all(|c| c.is_ascii()));
    assert!(p.char_range_up('\u{10FF00}').take(N).all(|c| c >= '\u{10FF00}'));
    assert!(p.char_range_down('!').take(N).all(|c| c <= '!'));
    assert_eq!(p.char_range('z', 'a').next(), None);
}

fn check_floats<P: IterableProvider>(p: &P) {
    assert!(p.ordinary_floats::<f32>().take(N).all(|f| f.is_finite() && f.to_bits() != (-0.0f32).to_bits()));
    assert!(p.float_range_down(-2.0f64).unwrap().take(N).all(|f| f <= -2.0));
    assert!(p.float_range(1.0f32, 1.5).unwrap().take(N).all(|f| (1.0..=1.5).contains(&f)));
    assert!(p.float_range_up(f32::NAN).is_err());
    assert!(p.floats::<f64>().take(N).all(|f| !f.is_nan() || f.to_bits() == f64::NAN.to_bits()));
}

fn check_decimals<P: IterableProvider>(p: &P) {
    assert!(p.big_decimals().take(N).all(|d| is_canonical(&d)));
    assert!(p.positive_big_decimals().take(N).all(|d| d.is_positive()));
    assert!(p.negative_big_decimals().take(N).all(|d| d.is_negative()));
    let a: BigDecimal = "1.5".parse().unwrap();
    assert!(p.big_decimal_range_up(a.clone()).take(N).all(|d| d >= a && is_canonical(&d)));
    assert!(p.big_decimal_range_down(a.clone()).take(N).all(|d| d <= a));
}

fn check_composites<P: IterableProvider>(p: &P) {
    assert!(p
        .pairs(p.booleans(), p.naturals::<u8>())
        .take(N)
        .all(|(_, n)| u32::from(n) <= 255));
    assert!(p
        .triples_from(p.range(0u8, 3))
        .take(N)
        .all(|(a, b, c)| a <= 3 && b <= 3 && c <= 3));
    assert!(p.lists_of_size(3, p.integers::<i32>()).take(N).all(|xs| xs.len() == 3));
    assert!(p.lists_at_least(2, p.booleans()).take(N).all(|xs| xs.len() >= 2));
    assert!(p.strings_at_least(1).take(N).all(|s| !s.is_empty()));
    assert!(p
        .strings_over(Box::new("xyz".chars()))
        .take(N)
        .all(|s| s.chars().all(|c| "xyz".contains(c))));
    let seven = p.septuples_from(p.booleans()).take(N).count();
    assert!(seven > 0);
}

fn check_all<P: IterableProvider>(p: &P) {
    check_integers(p);
    check_big_integers(p);
    check_characters(p);
    check_floats(p);
    check_decimals(p);
    check_composites(p);
}

#[test]
fn test_exhaustive_provider_honors_contract() {
    check_all(&ExhaustiveProvider);
}

#[test]
fn test_random_provider_honors_contract() {
    check_all(&RandomProvider::example());
}

#[test]
fn test_exhaustive_composites_have_no_duplicates() {
    let p = ExhaustiveProvider;
    let xs: Vec<(i8, i8, i8)> = p.triples_from(p.integers()).take(2000).collect();
    assert_eq!(xs.iter().collect::<HashSet<_>>().len(), xs.len());

    let lists: Vec<Vec<bool>> = p.lists(p.booleans()).take(500).collect();
    assert_eq!(lists.iter().collect::<HashSet<_>>().len(), lists.len());
}
