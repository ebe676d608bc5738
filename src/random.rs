//! Reproducible pseudorandom streams over every supported domain.
//!
//! A [`RandomProvider`] is a seed plus two scales. Every sequence it hands
//! out, including the length and null-marker draws of composites, owns a
//! [`RandomEngine`] on the next unused ChaCha stream of the seed. Sequences
//! are therefore independent of each other, and pulling from one never
//! disturbs another. Providers built from equal seeds and asked for the same
//! sequences in the same order produce equal output.

use std::cmp::Ordering;
use std::fmt;
use std::iter;
use std::sync::atomic::{self, AtomicU64};
use std::sync::Arc;

use bigdecimal::BigDecimal;
use log::{debug, trace};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

use crate::config::{ProviderConfig, Seed};
use crate::decimals::{abs, canonicalize, common_scale, unscaled_at};
use crate::distributions::{
    check_natural_scale, check_positive_scale, integer_geometric, natural_big_geometric,
    natural_geometric, positive_big_geometric, positive_geometric, RandomEngine,
};
use crate::error::{GenerationError, Result};
use crate::floats::{from_signed_zero_ordered, max_ordered, to_signed_zero_ordered, PrimitiveFloat};
use crate::ints::BoundedInteger;
use crate::iterables::{demux_zip, Iter, SharedSource};
use crate::providers::{negative_bounds, IterableProvider, Nullable};
use crate::strings::{char_at_index, char_index, SCALAR_VALUE_COUNT};

/// Panics with the error's message. Used where a contract method needs a
/// scale the provider was not configured with.
fn require(check: Result<()>) {
    if let Err(e) = check {
        panic!("{}", e);
    }
}

/// Moves the `n` elements of each row into a tuple.
macro_rules! rows_to_tuples {
    ($rows:expr, $($name:ident),+) => {
        Box::new($rows.filter_map(|row| {
            let mut row = row.into_iter();
            $(let $name = row.next()?;)+
            Some(($($name),+))
        }))
    };
}

/// Clones and rescaled copies share the stream counter, so sequences drawn
/// through any of them stay independent.
#[derive(Clone)]
pub struct RandomProvider {
    seed: Seed,
    config: ProviderConfig,
    streams: Arc<AtomicU64>,
}

impl fmt::Debug for RandomProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomProvider")
            .field("seed", &self.seed)
            .field("config", &self.config)
            .field("next_stream", &self.streams.load(atomic::Ordering::Relaxed))
            .finish()
    }
}

/// Providers are equal when they were built from the same seed and scales.
/// How many sequences each has handed out does not matter.
impl PartialEq for RandomProvider {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.config == other.config
    }
}

impl Eq for RandomProvider {}

impl RandomProvider {
    pub fn new(seed: Seed) -> Self {
        Self::with_config(seed, ProviderConfig::default())
    }

    pub fn with_config(seed: Seed, config: ProviderConfig) -> Self {
        debug!(
            "random provider seed={} scale={} secondary_scale={}",
            seed, config.scale, config.secondary_scale
        );
        RandomProvider {
            seed,
            config,
            streams: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Builds a provider from raw seed words, which must number exactly
    /// [`crate::config::SEED_SIZE`].
    pub fn from_words(words: &[u32]) -> Result<Self> {
        Ok(Self::new(Seed::new(words)?))
    }

    /// A provider with a fixed, documented seed.
    pub fn example() -> Self {
        Self::new(Seed::example())
    }

    /// A provider with a fresh seed from the operating system. Log or print
    /// [`RandomProvider::seed`] to reproduce a run.
    pub fn from_entropy() -> Self {
        Self::new(Seed::from_entropy())
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn scale(&self) -> u32 {
        self.config.scale
    }

    pub fn secondary_scale(&self) -> u32 {
        self.config.secondary_scale
    }

    /// A provider with the same seed and stream counter and a different
    /// scale.
    pub fn with_scale(&self, scale: u32) -> Self {
        self.rescaled(ProviderConfig { scale, ..self.config })
    }

    pub fn with_secondary_scale(&self, secondary_scale: u32) -> Self {
        self.rescaled(ProviderConfig {
            secondary_scale,
            ..self.config
        })
    }

    fn rescaled(&self, config: ProviderConfig) -> Self {
        debug!(
            "random provider seed={} scale={} secondary_scale={} (rescaled)",
            self.seed, config.scale, config.secondary_scale
        );
        RandomProvider {
            seed: self.seed,
            config,
            streams: Arc::clone(&self.streams),
        }
    }

    /// An engine on the next unused stream of the seed.
    fn engine(&self) -> RandomEngine {
        let stream = self.streams.fetch_add(1, atomic::Ordering::Relaxed);
        trace!("random provider opened stream {}", stream);
        RandomEngine::with_stream(&self.seed, stream)
    }

    /// An infinite sequence driven by a fresh element engine.
    fn generate<T, G>(&self, mut draw: G) -> Iter<T>
    where
        T: 'static,
        G: FnMut(&mut RandomEngine) -> T + 'static,
    {
        let mut engine = self.engine();
        Box::new(iter::repeat_with(move || draw(&mut engine)))
    }

    /// Naturals with mean `scale`.
    pub fn natural_integers_geometric(&self) -> Result<Iter<u64>> {
        check_natural_scale(self.scale())?;
        let scale = self.scale();
        Ok(self.generate(move |e| natural_geometric(e, scale)))
    }

    /// Positive integers with mean `scale`, which must be at least 2.
    pub fn positive_integers_geometric(&self) -> Result<Iter<u64>> {
        check_positive_scale(self.scale())?;
        let scale = self.scale();
        Ok(self.generate(move |e| positive_geometric(e, scale)))
    }

    /// Integers whose magnitude is a natural geometric draw, with a uniform
    /// sign.
    pub fn integers_geometric(&self) -> Result<Iter<i64>> {
        check_natural_scale(self.scale())?;
        let scale = self.scale();
        Ok(self.generate(move |e| integer_geometric(e, scale)))
    }

    /// Uniform draws from `items`. Empty when `items` is.
    pub fn uniform_samples<T: Clone + 'static>(&self, items: Vec<T>) -> Iter<T> {
        if items.is_empty() {
            return Box::new(iter::empty());
        }
        let count = items.len() as u128;
        self.generate(move |e| items[e.next_below(count) as usize].clone())
    }

    fn uniform_i128(&self, a: i128, b: i128) -> Iter<i128> {
        if a > b {
            return Box::new(iter::empty());
        }
        let span = (b - a) as u128 + 1;
        self.generate(move |e| a + e.next_below(span) as i128)
    }

    fn uniform_chars(&self, low: u32, high: u32) -> Iter<char> {
        if low > high {
            return Box::new(iter::empty());
        }
        let span = u128::from(high - low) + 1;
        Box::new(
            self.generate(move |e| char_at_index(low + e.next_below(span) as u32))
                .flatten(),
        )
    }

    fn uniform_floats<F: PrimitiveFloat>(&self, low: i64, high: i64) -> Iter<F> {
        if low > high {
            return Box::new(iter::empty());
        }
        let span = (i128::from(high) - i128::from(low)) as u128 + 1;
        Box::new(
            self.generate(move |e| {
                let ordered = i128::from(low) + e.next_below(span) as i128;
                from_signed_zero_ordered::<F>(ordered as i64).ok()
            })
            .flatten(),
        )
    }

    fn require_natural_scale(&self) {
        require(check_natural_scale(self.scale()));
    }

    fn require_positive_scale(&self) {
        require(check_positive_scale(self.scale()));
    }

    fn require_secondary_scale(&self, minimum: u32) {
        require(GenerationError::check_scale(
            "secondary scale",
            minimum,
            self.secondary_scale(),
        ));
    }

    /// Random decimals with `unscaled` drawn by `draw_unscaled` and a
    /// geometric decimal scale.
    fn decimals<G>(&self, mut draw_unscaled: G) -> Iter<BigDecimal>
    where
        G: FnMut(&mut RandomEngine) -> BigInt + 'static,
    {
        self.require_secondary_scale(1);
        let secondary_scale = self.secondary_scale();
        self.generate(move |e| {
            let unscaled = draw_unscaled(e);
            let scale = integer_geometric(e, secondary_scale);
            canonicalize(&BigDecimal::new(unscaled, scale))
        })
    }
}

fn signed(sign_negative: bool, magnitude: BigUint) -> BigInt {
    if sign_negative {
        BigInt::from_biguint(Sign::Minus, magnitude)
    } else {
        BigInt::from_biguint(Sign::Plus, magnitude)
    }
}

impl IterableProvider for RandomProvider {
    fn booleans(&self) -> Iter<bool> {
        self.generate(RandomEngine::next_bool)
    }

    fn orderings(&self) -> Iter<Ordering> {
        self.uniform_samples(vec![Ordering::Equal, Ordering::Less, Ordering::Greater])
    }

    fn integers<T: BoundedInteger>(&self) -> Iter<T> {
        self.range(T::MIN, T::MAX)
    }

    fn naturals<T: BoundedInteger>(&self) -> Iter<T> {
        Box::new(self.uniform_i128(0, T::MAX.to_i128()).map(T::from_i128))
    }

    fn positives<T: BoundedInteger>(&self) -> Iter<T> {
        Box::new(self.uniform_i128(1, T::MAX.to_i128()).map(T::from_i128))
    }

    fn negatives<T: BoundedInteger>(&self) -> Iter<T> {
        match negative_bounds::<T>() {
            Some((low, high)) => Box::new(self.uniform_i128(low, high).map(T::from_i128)),
            None => Box::new(iter::empty()),
        }
    }

    fn nonzero_integers<T: BoundedInteger>(&self) -> Iter<T> {
        if !T::SIGNED {
            return self.positives();
        }
        // Draw from one value fewer than the full range and skip over zero.
        let low = T::MIN.to_i128();
        let high = T::MAX.to_i128() - 1;
        Box::new(
            self.uniform_i128(low, high)
                .map(|n| T::from_i128(if n >= 0 { n + 1 } else { n })),
        )
    }

    fn range_up<T: BoundedInteger>(&self, a: T) -> Iter<T> {
        self.range(a, T::MAX)
    }

    fn range_down<T: BoundedInteger>(&self, a: T) -> Iter<T> {
        self.range(T::MIN, a)
    }

    fn range<T: BoundedInteger>(&self, a: T, b: T) -> Iter<T> {
        Box::new(self.uniform_i128(a.to_i128(), b.to_i128()).map(T::from_i128))
    }

    fn big_integers(&self) -> Iter<BigInt> {
        self.require_natural_scale();
        let scale = self.scale();
        self.generate(move |e| {
            let magnitude = natural_big_geometric(e, scale);
            let negative = !magnitude.is_zero() && e.next_bool();
            signed(negative, magnitude)
        })
    }

    fn natural_big_integers(&self) -> Iter<BigInt> {
        self.require_natural_scale();
        let scale = self.scale();
        self.generate(move |e| signed(false, natural_big_geometric(e, scale)))
    }

    fn positive_big_integers(&self) -> Iter<BigInt> {
        self.require_positive_scale();
        let scale = self.scale();
        self.generate(move |e| signed(false, positive_big_geometric(e, scale)))
    }

    fn negative_big_integers(&self) -> Iter<BigInt> {
        self.require_positive_scale();
        let scale = self.scale();
        self.generate(move |e| signed(true, positive_big_geometric(e, scale)))
    }

    fn big_integer_range_up(&self, a: BigInt) -> Iter<BigInt> {
        Box::new(self.natural_big_integers().map(move |n| &a + n))
    }

    fn big_integer_range_down(&self, a: BigInt) -> Iter<BigInt> {
        Box::new(self.natural_big_integers().map(move |n| &a - n))
    }

    fn big_integer_range(&self, a: BigInt, b: BigInt) -> Iter<BigInt> {
        let span = match (&b - &a + 1u32).to_biguint() {
            Some(span) if !span.is_zero() => span,
            _ => return Box::new(iter::empty()),
        };
        self.generate(move |e| &a + BigInt::from(e.next_below_big(&span)))
    }

    fn ascii_characters(&self) -> Iter<char> {
        self.generate(|e| char::from(e.next_bits(7) as u8))
    }

    fn characters(&self) -> Iter<char> {
        self.uniform_chars(0, SCALAR_VALUE_COUNT - 1)
    }

    fn char_range_up(&self, a: char) -> Iter<char> {
        self.char_range(a, char::MAX)
    }

    fn char_range_down(&self, a: char) -> Iter<char> {
        self.char_range('\u{0}', a)
    }

    fn char_range(&self, a: char, b: char) -> Iter<char> {
        self.uniform_chars(char_index(a), char_index(b))
    }

    fn ordinary_floats<F: PrimitiveFloat>(&self) -> Iter<F> {
        Box::new(
            self.floats()
                .filter(|f: &F| f.is_finite_value() && !f.is_negative_zero()),
        )
    }

    fn floats<F: PrimitiveFloat>(&self) -> Iter<F> {
        self.generate(RandomEngine::next_float::<F>)
    }

    fn float_range_up<F: PrimitiveFloat>(&self, a: F) -> Result<Iter<F>> {
        Ok(self.uniform_floats(to_signed_zero_ordered(a)?, max_ordered::<F>()))
    }

    fn float_range_down<F: PrimitiveFloat>(&self, a: F) -> Result<Iter<F>> {
        Ok(self.uniform_floats(-max_ordered::<F>() - 1, to_signed_zero_ordered(a)?))
    }

    fn float_range<F: PrimitiveFloat>(&self, a: F, b: F) -> Result<Iter<F>> {
        Ok(self.uniform_floats(to_signed_zero_ordered(a)?, to_signed_zero_ordered(b)?))
    }

    fn big_decimals(&self) -> Iter<BigDecimal> {
        self.require_natural_scale();
        let scale = self.scale();
        self.decimals(move |e| {
            let magnitude = natural_big_geometric(e, scale);
            let negative = !magnitude.is_zero() && e.next_bool();
            signed(negative, magnitude)
        })
    }

    fn positive_big_decimals(&self) -> Iter<BigDecimal> {
        self.require_positive_scale();
        let scale = self.scale();
        self.decimals(move |e| signed(false, positive_big_geometric(e, scale)))
    }

    fn negative_big_decimals(&self) -> Iter<BigDecimal> {
        self.require_positive_scale();
        let scale = self.scale();
        self.decimals(move |e| signed(true, positive_big_geometric(e, scale)))
    }

    fn big_decimal_range_up(&self, a: BigDecimal) -> Iter<BigDecimal> {
        Box::new(self.big_decimals().map(move |d| canonicalize(&(&a + abs(&d)))))
    }

    fn big_decimal_range_down(&self, a: BigDecimal) -> Iter<BigDecimal> {
        Box::new(self.big_decimals().map(move |d| canonicalize(&(&a - abs(&d)))))
    }

    fn big_decimal_range(&self, a: BigDecimal, b: BigDecimal) -> Iter<BigDecimal> {
        match a.cmp(&b) {
            Ordering::Greater => Box::new(iter::empty()),
            Ordering::Equal => Box::new(iter::repeat(canonicalize(&a))),
            Ordering::Less => {
                self.require_secondary_scale(1);
                let secondary_scale = self.secondary_scale();
                let base_scale = common_scale(&a, &b);
                self.generate(move |e| {
                    let scale = base_scale + natural_geometric(e, secondary_scale) as i64;
                    let low = unscaled_at(&a, scale);
                    let high = unscaled_at(&b, scale);
                    let span = (&high - &low + 1u32).to_biguint().unwrap_or_default();
                    let offset = BigInt::from(e.next_below_big(&span));
                    canonicalize(&BigDecimal::new(low + offset, scale))
                })
            }
        }
    }

    fn with_null<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Nullable<T>> {
        self.require_natural_scale();
        let scale = u64::from(self.scale());
        let mut markers = self.engine();
        let mut xs = xs;
        Box::new(iter::from_fn(move || {
            if markers.next_below_u64(scale) == 0 {
                Some(Nullable::Null)
            } else {
                xs.next().map(Nullable::Value)
            }
        }))
    }

    fn optionals<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Option<T>> {
        self.require_natural_scale();
        let scale = u64::from(self.scale());
        let mut markers = self.engine();
        let mut xs = xs;
        Box::new(iter::from_fn(move || {
            if markers.next_below_u64(scale) == 0 {
                Some(None)
            } else {
                xs.next().map(Some)
            }
        }))
    }

    fn pairs<A, B>(&self, xs: Iter<A>, ys: Iter<B>) -> Iter<(A, B)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
    {
        Box::new(xs.zip(ys))
    }

    fn pairs_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T)> {
        rows_to_tuples!(demux_zip(2, xs), a, b)
    }

    fn triples<A, B, C>(&self, xs: Iter<A>, ys: Iter<B>, zs: Iter<C>) -> Iter<(A, B, C)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
    {
        Box::new(xs.zip(ys).zip(zs).map(|((a, b), c)| (a, b, c)))
    }

    fn triples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T)> {
        rows_to_tuples!(demux_zip(3, xs), a, b, c)
    }

    fn quadruples<A, B, C, D>(
        &self,
        as_: Iter<A>,
        bs: Iter<B>,
        cs: Iter<C>,
        ds: Iter<D>,
    ) -> Iter<(A, B, C, D)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
    {
        Box::new(
            as_.zip(bs)
                .zip(cs)
                .zip(ds)
                .map(|(((a, b), c), d)| (a, b, c, d)),
        )
    }

    fn quadruples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T)> {
        rows_to_tuples!(demux_zip(4, xs), a, b, c, d)
    }

    fn quintuples<A, B, C, D, E>(
        &self,
        as_: Iter<A>,
        bs: Iter<B>,
        cs: Iter<C>,
        ds: Iter<D>,
        es: Iter<E>,
    ) -> Iter<(A, B, C, D, E)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
        E: Clone + 'static,
    {
        Box::new(
            as_.zip(bs)
                .zip(cs)
                .zip(ds)
                .zip(es)
                .map(|((((a, b), c), d), e)| (a, b, c, d, e)),
        )
    }

    fn quintuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T)> {
        rows_to_tuples!(demux_zip(5, xs), a, b, c, d, e)
    }

    fn sextuples<A, B, C, D, E, F>(
        &self,
        as_: Iter<A>,
        bs: Iter<B>,
        cs: Iter<C>,
        ds: Iter<D>,
        es: Iter<E>,
        fs: Iter<F>,
    ) -> Iter<(A, B, C, D, E, F)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
        E: Clone + 'static,
        F: Clone + 'static,
    {
        Box::new(
            as_.zip(bs)
                .zip(cs)
                .zip(ds)
                .zip(es)
                .zip(fs)
                .map(|(((((a, b), c), d), e), f)| (a, b, c, d, e, f)),
        )
    }

    fn sextuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T, T)> {
        rows_to_tuples!(demux_zip(6, xs), a, b, c, d, e, f)
    }

    fn septuples<A, B, C, D, E, F, G>(
        &self,
        as_: Iter<A>,
        bs: Iter<B>,
        cs: Iter<C>,
        ds: Iter<D>,
        es: Iter<E>,
        fs: Iter<F>,
        gs: Iter<G>,
    ) -> Iter<(A, B, C, D, E, F, G)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
        E: Clone + 'static,
        F: Clone + 'static,
        G: Clone + 'static,
    {
        Box::new(
            as_.zip(bs)
                .zip(cs)
                .zip(ds)
                .zip(es)
                .zip(fs)
                .zip(gs)
                .map(|((((((a, b), c), d), e), f), g)| (a, b, c, d, e, f, g)),
        )
    }

    fn septuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T, T, T)> {
        rows_to_tuples!(demux_zip(7, xs), a, b, c, d, e, f, g)
    }

    fn lists_of_size<T: Clone + 'static>(&self, size: usize, xs: Iter<T>) -> Iter<Vec<T>> {
        demux_zip(size, xs)
    }

    fn lists<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Vec<T>> {
        self.lists_at_least(0, xs)
    }

    fn lists_at_least<T: Clone + 'static>(&self, min_size: usize, xs: Iter<T>) -> Iter<Vec<T>> {
        let minimum = u32::try_from(min_size).map_or(u32::MAX, |m| m.saturating_add(1));
        self.require_secondary_scale(minimum);
        let length_scale = self.secondary_scale() - min_size as u32;
        let mut lengths = self.engine();
        // Elements come from a cyclic view, so a finite source still fills
        // every list. An empty source ends at the first non-empty length.
        let mut elements = SharedSource::new(xs).cycle();
        Box::new(iter::from_fn(move || {
            let length = min_size + natural_geometric(&mut lengths, length_scale) as usize;
            let list: Vec<T> = elements.by_ref().take(length).collect();
            if list.len() < length {
                return None;
            }
            Some(list)
        }))
    }
}
