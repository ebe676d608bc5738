//! Deterministic, total enumerations of every supported domain.
//!
//! Integers come in magnitude order (0, 1, -1, 2, -2, ...) restricted to the
//! requested range, and ranges that stay on one side of zero count away from
//! it. Floats walk their ordered representation outward from zero; ordinary
//! floats are reached through (mantissa, exponent) pairs. Composite domains
//! are dovetailed, see [`crate::dovetail`].

use std::cmp::Ordering;
use std::iter;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::decimals::{canonicalize, from_canonical_pair, range_by_precision};
use crate::dovetail;
use crate::error::Result;
use crate::floats::{
    from_mantissa_and_exponent, from_signed_zero_ordered, max_ordered, to_signed_zero_ordered,
    FloatWidth, PrimitiveFloat,
};
use crate::ints::BoundedInteger;
use crate::iterables::{boxed, interleave, unique_checked, Iter, SharedSource};
use crate::providers::{negative_bounds, IterableProvider, Nullable};
use crate::strings::{char_range, char_range_down, char_range_up, friendly_ascii, friendly_characters};

/// The exhaustive provider. It carries no state; every instance is the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExhaustiveProvider;

/// `[a, b]` in magnitude order.
fn magnitude_order(a: i128, b: i128) -> Iter<i128> {
    if a > b {
        boxed(iter::empty())
    } else if a >= 0 {
        boxed(a..=b)
    } else if b <= 0 {
        boxed((a..=b).rev())
    } else {
        Box::new(iter::once(0).chain(interleave(boxed(1..=b), boxed((a..=-1).rev()))))
    }
}

fn bounded<T: BoundedInteger>(xs: Iter<i128>) -> Iter<T> {
    Box::new(xs.map(T::from_i128))
}

/// Counts from `start` by one towards `end`, or forever when `end` is
/// `None`.
fn walk(start: BigInt, end: Option<BigInt>, ascending: bool) -> Iter<BigInt> {
    let mut next = Some(start);
    Box::new(iter::from_fn(move || {
        let current = next.take()?;
        let within = match &end {
            Some(end) if ascending => &current <= end,
            Some(end) => &current >= end,
            None => true,
        };
        if !within {
            return None;
        }
        next = Some(if ascending { &current + 1u32 } else { &current - 1u32 });
        Some(current)
    }))
}

/// Arbitrary-precision integers between optional bounds, in magnitude order.
fn big_magnitude_order(low: Option<BigInt>, high: Option<BigInt>) -> Iter<BigInt> {
    if let (Some(low), Some(high)) = (&low, &high) {
        if low > high {
            return boxed(iter::empty());
        }
    }
    match (low, high) {
        (Some(low), high) if !low.is_negative() => walk(low, high, true),
        (low, Some(high)) if !high.is_positive() => walk(high, low, false),
        (low, high) => Box::new(
            iter::once(BigInt::zero()).chain(interleave(
                walk(BigInt::from(1), high, true),
                walk(BigInt::from(-1), low, false),
            )),
        ),
    }
}

/// Floats whose signed-zero ordered representation lies in `[low, high]`,
/// walking outward from zero.
fn float_walk<F: PrimitiveFloat>(low: i64, high: i64) -> Iter<F> {
    let ordered: Iter<i64> = if low > high {
        boxed(iter::empty())
    } else if low >= 0 {
        boxed(low..=high)
    } else if high <= -1 {
        boxed((low..=high).rev())
    } else {
        Box::new([-1, 0].into_iter().chain(interleave(boxed(1..=high), boxed((low..=-2).rev()))))
    };
    Box::new(ordered.filter_map(|i| from_signed_zero_ordered(i).ok()))
}

fn signed_zero_bounds<F: PrimitiveFloat>() -> (i64, i64) {
    (-max_ordered::<F>() - 1, max_ordered::<F>())
}

/// Exponents in magnitude order across the full range of `width`.
fn exponents(width: FloatWidth) -> Iter<i32> {
    let low = i128::from(width.min_binary_exponent());
    let high = i128::from(width.max_binary_exponent());
    Box::new(magnitude_order(low, high).map(|e| e as i32))
}

/// Odd mantissas that fit in the precision of `width`.
fn odd_mantissas(width: FloatWidth) -> Iter<i64> {
    let limit = 1i64 << width.precision();
    Box::new((0i64..).map(|k| 2 * k + 1).take_while(move |&m| m < limit))
}

fn shared<T: Clone + 'static>(xs: Iter<T>) -> SharedSource<T> {
    SharedSource::new(xs)
}

fn canonical_decimals(unscaled: Iter<BigInt>) -> Iter<BigDecimal> {
    let scales = SharedSource::new(bounded::<i32>(magnitude_order(
        i128::from(i32::MIN),
        i128::from(i32::MAX),
    )));
    Box::new(
        dovetail::pairs_logarithmic(SharedSource::new(unscaled), scales)
            .filter_map(|(unscaled, scale)| from_canonical_pair(unscaled, i64::from(scale))),
    )
}

fn nonnegative_decimals() -> Iter<BigDecimal> {
    Box::new(iter::once(BigDecimal::zero()).chain(ExhaustiveProvider.positive_big_decimals()))
}

impl ExhaustiveProvider {
    pub fn new() -> Self {
        ExhaustiveProvider
    }

    /// Pairs with the second component growing like the log of the first.
    pub fn pairs_logarithmic_order<A, B>(&self, xs: Iter<A>, ys: Iter<B>) -> Iter<(A, B)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
    {
        dovetail::pairs_logarithmic(shared(xs), shared(ys))
    }

    /// Pairs with the second component growing like the square root of the
    /// first.
    pub fn pairs_square_root_order<A, B>(&self, xs: Iter<A>, ys: Iter<B>) -> Iter<(A, B)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
    {
        dovetail::pairs_square_root(shared(xs), shared(ys))
    }

    /// All lists over a finite alphabet by length, then lexicographically.
    pub fn lists_shortlex<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Vec<T>> {
        dovetail::lists_shortlex(xs)
    }

    pub fn strings_shortlex(&self, alphabet: Iter<char>) -> Iter<String> {
        dovetail::strings_shortlex(alphabet)
    }

    /// Passes `xs` through, panicking on the first repeated element.
    pub fn unique_checked<T>(&self, xs: Iter<T>) -> Iter<T>
    where
        T: Eq + std::hash::Hash + Clone + std::fmt::Debug + 'static,
    {
        unique_checked(xs)
    }
}

impl IterableProvider for ExhaustiveProvider {
    fn booleans(&self) -> Iter<bool> {
        boxed([false, true])
    }

    fn orderings(&self) -> Iter<Ordering> {
        boxed([Ordering::Equal, Ordering::Less, Ordering::Greater])
    }

    fn integers<T: BoundedInteger>(&self) -> Iter<T> {
        self.range(T::MIN, T::MAX)
    }

    fn naturals<T: BoundedInteger>(&self) -> Iter<T> {
        bounded(magnitude_order(0, T::MAX.to_i128()))
    }

    fn positives<T: BoundedInteger>(&self) -> Iter<T> {
        bounded(magnitude_order(1, T::MAX.to_i128()))
    }

    fn negatives<T: BoundedInteger>(&self) -> Iter<T> {
        match negative_bounds::<T>() {
            Some((low, high)) => bounded(magnitude_order(low, high)),
            None => boxed(iter::empty()),
        }
    }

    fn nonzero_integers<T: BoundedInteger>(&self) -> Iter<T> {
        interleave(self.positives(), self.negatives())
    }

    fn range_up<T: BoundedInteger>(&self, a: T) -> Iter<T> {
        self.range(a, T::MAX)
    }

    fn range_down<T: BoundedInteger>(&self, a: T) -> Iter<T> {
        self.range(T::MIN, a)
    }

    fn range<T: BoundedInteger>(&self, a: T, b: T) -> Iter<T> {
        bounded(magnitude_order(a.to_i128(), b.to_i128()))
    }

    fn big_integers(&self) -> Iter<BigInt> {
        big_magnitude_order(None, None)
    }

    fn natural_big_integers(&self) -> Iter<BigInt> {
        walk(BigInt::zero(), None, true)
    }

    fn positive_big_integers(&self) -> Iter<BigInt> {
        walk(BigInt::from(1), None, true)
    }

    fn negative_big_integers(&self) -> Iter<BigInt> {
        walk(BigInt::from(-1), None, false)
    }

    fn big_integer_range_up(&self, a: BigInt) -> Iter<BigInt> {
        big_magnitude_order(Some(a), None)
    }

    fn big_integer_range_down(&self, a: BigInt) -> Iter<BigInt> {
        big_magnitude_order(None, Some(a))
    }

    fn big_integer_range(&self, a: BigInt, b: BigInt) -> Iter<BigInt> {
        big_magnitude_order(Some(a), Some(b))
    }

    fn ascii_characters(&self) -> Iter<char> {
        friendly_ascii()
    }

    fn characters(&self) -> Iter<char> {
        friendly_characters()
    }

    fn char_range_up(&self, a: char) -> Iter<char> {
        char_range_up(a)
    }

    fn char_range_down(&self, a: char) -> Iter<char> {
        char_range_down(a)
    }

    fn char_range(&self, a: char, b: char) -> Iter<char> {
        char_range(a, b)
    }

    fn ordinary_floats<F: PrimitiveFloat>(&self) -> Iter<F> {
        let mantissas = shared(odd_mantissas(F::WIDTH));
        let exponents = shared(exponents(F::WIDTH));
        let nonzero = dovetail::pairs_square_root(mantissas, exponents)
            .filter_map(|(m, e)| from_mantissa_and_exponent::<F>(m, e))
            .flat_map(|f| [f, f.negate()]);
        Box::new(iter::once(F::positive_zero()).chain(nonzero))
    }

    /// Every value of the type, walking the ordered representation outward
    /// from zero. NaN sits between the two zeros and the infinities come last.
    fn floats<F: PrimitiveFloat>(&self) -> Iter<F> {
        let (low, high) = signed_zero_bounds::<F>();
        let mut walk = float_walk::<F>(low, high);
        let negative_zero = walk.next();
        Box::new(
            negative_zero
                .into_iter()
                .chain(iter::once(F::canonical_nan()))
                .chain(walk),
        )
    }

    fn float_range_up<F: PrimitiveFloat>(&self, a: F) -> Result<Iter<F>> {
        let (_, high) = signed_zero_bounds::<F>();
        Ok(float_walk(to_signed_zero_ordered(a)?, high))
    }

    fn float_range_down<F: PrimitiveFloat>(&self, a: F) -> Result<Iter<F>> {
        let (low, _) = signed_zero_bounds::<F>();
        Ok(float_walk(low, to_signed_zero_ordered(a)?))
    }

    fn float_range<F: PrimitiveFloat>(&self, a: F, b: F) -> Result<Iter<F>> {
        Ok(float_walk(to_signed_zero_ordered(a)?, to_signed_zero_ordered(b)?))
    }

    fn big_decimals(&self) -> Iter<BigDecimal> {
        canonical_decimals(self.big_integers())
    }

    fn positive_big_decimals(&self) -> Iter<BigDecimal> {
        canonical_decimals(self.positive_big_integers())
    }

    fn negative_big_decimals(&self) -> Iter<BigDecimal> {
        canonical_decimals(self.negative_big_integers())
    }

    fn big_decimal_range_up(&self, a: BigDecimal) -> Iter<BigDecimal> {
        Box::new(nonnegative_decimals().map(move |d| canonicalize(&(&a + d))))
    }

    fn big_decimal_range_down(&self, a: BigDecimal) -> Iter<BigDecimal> {
        Box::new(nonnegative_decimals().map(move |d| canonicalize(&(&a - d))))
    }

    fn big_decimal_range(&self, a: BigDecimal, b: BigDecimal) -> Iter<BigDecimal> {
        range_by_precision(a, b)
    }

    fn with_null<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Nullable<T>> {
        Box::new(iter::once(Nullable::Null).chain(xs.map(Nullable::Value)))
    }

    fn optionals<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Option<T>> {
        Box::new(iter::once(None).chain(xs.map(Some)))
    }

    fn pairs<A, B>(&self, xs: Iter<A>, ys: Iter<B>) -> Iter<(A, B)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
    {
        dovetail::pairs(shared(xs), shared(ys))
    }

    fn pairs_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T)> {
        let xs = shared(xs);
        dovetail::pairs(xs.clone(), xs)
    }

    fn triples<A, B, C>(&self, xs: Iter<A>, ys: Iter<B>, zs: Iter<C>) -> Iter<(A, B, C)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
    {
        dovetail::triples(shared(xs), shared(ys), shared(zs))
    }

    fn triples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T)> {
        let xs = shared(xs);
        dovetail::triples(xs.clone(), xs.clone(), xs)
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
        dovetail::quadruples(shared(as_), shared(bs), shared(cs), shared(ds))
    }

    fn quadruples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T)> {
        let xs = shared(xs);
        dovetail::quadruples(xs.clone(), xs.clone(), xs.clone(), xs)
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
        dovetail::quintuples(shared(as_), shared(bs), shared(cs), shared(ds), shared(es))
    }

    fn quintuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T)> {
        let xs = shared(xs);
        dovetail::quintuples(xs.clone(), xs.clone(), xs.clone(), xs.clone(), xs)
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
        dovetail::sextuples(
            shared(as_),
            shared(bs),
            shared(cs),
            shared(ds),
            shared(es),
            shared(fs),
        )
    }

    fn sextuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T, T)> {
        let xs = shared(xs);
        dovetail::sextuples(xs.clone(), xs.clone(), xs.clone(), xs.clone(), xs.clone(), xs)
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
        dovetail::septuples(
            shared(as_),
            shared(bs),
            shared(cs),
            shared(ds),
            shared(es),
            shared(fs),
            shared(gs),
        )
    }

    fn septuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T, T, T)> {
        let xs = shared(xs);
        dovetail::septuples(
            xs.clone(),
            xs.clone(),
            xs.clone(),
            xs.clone(),
            xs.clone(),
            xs.clone(),
            xs,
        )
    }

    fn lists_of_size<T: Clone + 'static>(&self, size: usize, xs: Iter<T>) -> Iter<Vec<T>> {
        dovetail::lists_of_size(size, shared(xs))
    }

    fn lists<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Vec<T>> {
        dovetail::lists(shared(xs))
    }

    fn lists_at_least<T: Clone + 'static>(&self, min_size: usize, xs: Iter<T>) -> Iter<Vec<T>> {
        dovetail::lists_at_least(min_size, shared(xs))
    }
}
