// Pseudorandom engine and distribution shaping.
// This module contains the seeded bit source used by the random provider,
// uniform sampling over arbitrary ranges by rejection, and the run-length
// geometric distributions that pick lengths and magnitudes.

use log::trace;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Seed;
use crate::error::{GenerationError, Result};
use crate::floats::PrimitiveFloat;

/// Seeded bit source owned by exactly one sequence cursor.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: ChaCha8Rng,
}

impl RandomEngine {
    /// An engine on the first stream of the seed.
    pub fn new(seed: &Seed) -> Self {
        Self::with_stream(seed, 0)
    }

    /// An engine on an independent stream of the same seed.
    pub fn with_stream(seed: &Seed, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::from_seed(seed.to_bytes());
        rng.set_stream(stream);
        RandomEngine { rng }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// `n` uniform bits, `n <= 64`.
    pub fn next_bits(&mut self, n: u32) -> u64 {
        debug_assert!(n <= 64);
        match n {
            0 => 0,
            64 => self.next_u64(),
            _ => self.next_u64() >> (64 - n),
        }
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_bits(1) == 1
    }

    /// `n` uniform bits as a natural.
    pub fn next_big_bits(&mut self, n: u64) -> BigUint {
        let words = ((n + 31) / 32) as usize;
        let mut digits: Vec<u32> = (0..words).map(|_| self.next_u32()).collect();
        let spare = (words as u64) * 32 - n;
        if let Some(top) = digits.last_mut() {
            if spare > 0 {
                *top >>= spare;
            }
        }
        BigUint::new(digits)
    }

    /// Uniform in `[0, n)`. Draws the bit width of `n - 1` and rejects
    /// samples that land at or above `n`.
    pub fn next_below(&mut self, n: u128) -> u128 {
        debug_assert!(n > 0);
        let width = 128 - (n - 1).leading_zeros();
        loop {
            let sample = if width > 64 {
                let high = u128::from(self.next_bits(width - 64));
                (high << 64) | u128::from(self.next_u64())
            } else {
                u128::from(self.next_bits(width))
            };
            if sample < n {
                return sample;
            }
            trace!("rejected sample {} for range of size {}", sample, n);
        }
    }

    pub fn next_below_u64(&mut self, n: u64) -> u64 {
        self.next_below(u128::from(n)) as u64
    }

    /// Uniform in `[0, n)` for an arbitrary-precision bound.
    pub fn next_below_big(&mut self, n: &BigUint) -> BigUint {
        debug_assert!(!n.is_zero());
        let width = (n - BigUint::one()).bits();
        loop {
            let sample = self.next_big_bits(width);
            if &sample < n {
                return sample;
            }
            trace!("rejected sample {} for range of size {}", sample, n);
        }
    }

    /// A uniformly random bit pattern of `F`. NaN patterns other than the
    /// canonical one are redrawn, so NaN keeps the weight of a single value.
    pub fn next_float<F: PrimitiveFloat>(&mut self) -> F {
        let width = F::WIDTH;
        loop {
            let bits = self.next_bits(width.bits());
            if !width.is_nan_bits(bits) || bits == width.canonical_nan_bits() {
                return F::from_bits_u64(bits);
            }
            trace!("rejected stray NaN pattern {:#x}", bits);
        }
    }
}

/// Checks the scale of [`positive_geometric`].
pub fn check_positive_scale(scale: u32) -> Result<()> {
    GenerationError::check_scale("scale", 2, scale)
}

/// Checks the scale of [`natural_geometric`].
pub fn check_natural_scale(scale: u32) -> Result<()> {
    GenerationError::check_scale("scale", 1, scale)
}

/// One plus the run of non-zero draws from `[0, scale)` before the first
/// zero. The mean is `scale`, which must be at least 2.
pub fn positive_geometric(engine: &mut RandomEngine, scale: u32) -> u64 {
    debug_assert!(scale >= 2);
    let mut count = 1;
    while engine.next_below_u64(u64::from(scale)) != 0 {
        count += 1;
    }
    count
}

/// `positive_geometric(scale + 1) - 1`, with mean `scale >= 1`.
pub fn natural_geometric(engine: &mut RandomEngine, scale: u32) -> u64 {
    debug_assert!(scale >= 1);
    positive_geometric(engine, scale.saturating_add(1)) - 1
}

/// Zero, or a natural geometric magnitude with a uniform sign.
pub fn integer_geometric(engine: &mut RandomEngine, scale: u32) -> i64 {
    let magnitude = natural_geometric(engine, scale) as i64;
    if magnitude != 0 && engine.next_bool() {
        -magnitude
    } else {
        magnitude
    }
}

/// A natural whose bit length is a natural geometric draw: the top bit is
/// set and the rest are uniform.
pub fn natural_big_geometric(engine: &mut RandomEngine, scale: u32) -> BigUint {
    let length = natural_geometric(engine, scale);
    with_bit_length(engine, length)
}

/// Like [`natural_big_geometric`] but never zero; `scale >= 2`.
pub fn positive_big_geometric(engine: &mut RandomEngine, scale: u32) -> BigUint {
    let length = positive_geometric(engine, scale);
    with_bit_length(engine, length)
}

fn with_bit_length(engine: &mut RandomEngine, length: u64) -> BigUint {
    if length == 0 {
        return BigUint::zero();
    }
    let mut n = engine.next_big_bits(length - 1);
    n.set_bit(length - 1, true);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RandomEngine {
        RandomEngine::new(&Seed::example())
    }

    #[test]
    fn test_engine_is_deterministic() {
        let mut a = engine();
        let mut b = engine();
        let xs: Vec<u64> = (0..50).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..50).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_streams_differ() {
        let mut a = RandomEngine::with_stream(&Seed::example(), 0);
        let mut b = RandomEngine::with_stream(&Seed::example(), 1);
        let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_next_below_stays_in_range() {
        let mut e = engine();
        let mut seen = [false; 5];
        for _ in 0..500 {
            let x = e.next_below(5);
            assert!(x < 5);
            seen[x as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(e.next_below(1), 0);
        let wide = u128::from(u64::MAX) * 3;
        assert!(e.next_below(wide) < wide);
    }

    #[test]
    fn test_next_big_bits_width() {
        let mut e = engine();
        for n in [0u64, 1, 31, 32, 33, 100] {
            assert!(e.next_big_bits(n).bits() <= n);
        }
        let bound = BigUint::from(1000u32);
        for _ in 0..100 {
            assert!(e.next_below_big(&bound) < bound);
        }
    }

    #[test]
    fn test_geometric_means() {
        let mut e = engine();
        let samples = 20_000;
        let total: u64 = (0..samples).map(|_| natural_geometric(&mut e, 8)).sum();
        let mean = total as f64 / samples as f64;
        assert!((mean - 8.0).abs() < 0.5, "mean was {}", mean);

        let total: u64 = (0..samples).map(|_| positive_geometric(&mut e, 4)).sum();
        let mean = total as f64 / samples as f64;
        assert!((mean - 4.0).abs() < 0.3, "mean was {}", mean);
    }

    #[test]
    fn test_positive_geometric_is_positive() {
        let mut e = engine();
        assert!((0..1000).all(|_| positive_geometric(&mut e, 2) >= 1));
    }

    #[test]
    fn test_big_geometric_bit_length() {
        let mut e = engine();
        for _ in 0..200 {
            let n = positive_big_geometric(&mut e, 16);
            assert!(!n.is_zero());
        }
    }

    #[test]
    fn test_scale_checks() {
        assert!(check_natural_scale(1).is_ok());
        assert!(check_natural_scale(0).is_err());
        assert!(check_positive_scale(2).is_ok());
        assert!(check_positive_scale(1).is_err());
    }

    #[test]
    fn test_random_floats_only_use_canonical_nan() {
        let mut e = engine();
        for _ in 0..10_000 {
            let f: f32 = e.next_float();
            if f.is_nan() {
                assert_eq!(f.to_bits(), f32::NAN.to_bits());
            }
        }
    }
}
