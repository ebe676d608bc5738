//! Provider contract shared by the exhaustive and random providers
//!
//! Call sites are written against [`IterableProvider`] only, so the same
//! property can be checked once over an exhaustive enumeration and once over
//! a pseudorandom stream without code changes. Every method returns a fresh
//! lazy sequence; calling a method twice never shares a cursor.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::error::Result;
use crate::floats::PrimitiveFloat;
use crate::ints::BoundedInteger;
use crate::iterables::Iter;
use crate::strings::collect_string;

/// A domain value that may be the domain's own null.
///
/// This is distinct from `Option`: `Option<Nullable<T>>` separates "no value
/// was generated" from "the generated value is null".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nullable<T> {
    Null,
    Value(T),
}

impl<T> Nullable<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn value(self) -> Option<T> {
        match self {
            Nullable::Null => None,
            Nullable::Value(x) => Some(x),
        }
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Null => Nullable::Null,
            Nullable::Value(x) => Nullable::Value(x),
        }
    }
}

impl<T: Display> Display for Nullable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nullable::Null => write!(f, "null"),
            Nullable::Value(x) => write!(f, "{}", x),
        }
    }
}

/// Maps generated character lists to strings.
pub fn to_strings(lists: Iter<Vec<char>>) -> Iter<String> {
    Box::new(lists.map(collect_string))
}

/// Bounds of the strictly negative values of `T`, if it has any.
pub fn negative_bounds<T: BoundedInteger>() -> Option<(i128, i128)> {
    if T::SIGNED {
        Some((T::MIN.to_i128(), -1))
    } else {
        None
    }
}

/// Every value the providers can generate, as lazy sequences
///
/// Element types of composite sequences only need `Clone + 'static`; the
/// exhaustive provider replays component prefixes, the random provider
/// consumes them once.
pub trait IterableProvider: Debug {
    /// `false` and `true`
    fn booleans(&self) -> Iter<bool>;

    /// The three values of `std::cmp::Ordering`
    fn orderings(&self) -> Iter<Ordering>;

    /// Every value of an integer type
    fn integers<T: BoundedInteger>(&self) -> Iter<T>;

    /// Non-negative values of an integer type
    fn naturals<T: BoundedInteger>(&self) -> Iter<T>;

    /// Strictly positive values of an integer type
    fn positives<T: BoundedInteger>(&self) -> Iter<T>;

    /// Strictly negative values of an integer type (none for unsigned types)
    fn negatives<T: BoundedInteger>(&self) -> Iter<T>;

    fn nonzero_integers<T: BoundedInteger>(&self) -> Iter<T>;

    /// Values `>= a`
    fn range_up<T: BoundedInteger>(&self, a: T) -> Iter<T>;

    /// Values `<= a`
    fn range_down<T: BoundedInteger>(&self, a: T) -> Iter<T>;

    /// Values in `[a, b]`; empty when `a > b`
    fn range<T: BoundedInteger>(&self, a: T, b: T) -> Iter<T>;

    fn big_integers(&self) -> Iter<BigInt>;

    fn natural_big_integers(&self) -> Iter<BigInt>;

    fn positive_big_integers(&self) -> Iter<BigInt>;

    fn negative_big_integers(&self) -> Iter<BigInt>;

    fn big_integer_range_up(&self, a: BigInt) -> Iter<BigInt>;

    fn big_integer_range_down(&self, a: BigInt) -> Iter<BigInt>;

    fn big_integer_range(&self, a: BigInt, b: BigInt) -> Iter<BigInt>;

    fn ascii_characters(&self) -> Iter<char>;

    fn characters(&self) -> Iter<char>;

    fn char_range_up(&self, a: char) -> Iter<char>;

    fn char_range_down(&self, a: char) -> Iter<char>;

    fn char_range(&self, a: char, b: char) -> Iter<char>;

    /// Finite floats other than -0.0
    fn ordinary_floats<F: PrimitiveFloat>(&self) -> Iter<F>;

    /// Every float: NaN (one canonical pattern), both infinities and both
    /// zeros included
    fn floats<F: PrimitiveFloat>(&self) -> Iter<F>;

    /// Floats `>= a`, including +infinity. NaN bounds are rejected.
    fn float_range_up<F: PrimitiveFloat>(&self, a: F) -> Result<Iter<F>>;

    /// Floats `<= a`, including -infinity. NaN bounds are rejected.
    fn float_range_down<F: PrimitiveFloat>(&self, a: F) -> Result<Iter<F>>;

    /// Floats in `[a, b]`, where -0.0 counts as just below 0.0. NaN bounds
    /// are rejected.
    fn float_range<F: PrimitiveFloat>(&self, a: F, b: F) -> Result<Iter<F>>;

    /// Canonical decimals (no trailing zero digits)
    fn big_decimals(&self) -> Iter<BigDecimal>;

    fn positive_big_decimals(&self) -> Iter<BigDecimal>;

    fn negative_big_decimals(&self) -> Iter<BigDecimal>;

    fn big_decimal_range_up(&self, a: BigDecimal) -> Iter<BigDecimal>;

    fn big_decimal_range_down(&self, a: BigDecimal) -> Iter<BigDecimal>;

    fn big_decimal_range(&self, a: BigDecimal, b: BigDecimal) -> Iter<BigDecimal>;

    /// The elements of `xs` plus a null value
    fn with_null<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Nullable<T>>;

    /// The elements of `xs` plus an absent value
    fn optionals<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Option<T>>;

    /// The elements of `xs` plus both a null and an absent value
    fn nullable_optionals<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Option<Nullable<T>>> {
        self.optionals(self.with_null(xs))
    }

    fn pairs<A, B>(&self, xs: Iter<A>, ys: Iter<B>) -> Iter<(A, B)>
    where
        A: Clone + 'static,
        B: Clone + 'static;

    /// Pairs with both components drawn from one sequence
    fn pairs_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T)>;

    fn triples<A, B, C>(&self, xs: Iter<A>, ys: Iter<B>, zs: Iter<C>) -> Iter<(A, B, C)>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static;

    fn triples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T)>;

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
        D: Clone + 'static;

    fn quadruples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T)>;

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
        E: Clone + 'static;

    fn quintuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T)>;

    #[allow(clippy::too_many_arguments)]
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
        F: Clone + 'static;

    fn sextuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T, T)>;

    #[allow(clippy::too_many_arguments)]
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
        G: Clone + 'static;

    fn septuples_from<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<(T, T, T, T, T, T, T)>;

    /// Lists of exactly `size` elements
    fn lists_of_size<T: Clone + 'static>(&self, size: usize, xs: Iter<T>) -> Iter<Vec<T>>;

    /// Lists of any length
    fn lists<T: Clone + 'static>(&self, xs: Iter<T>) -> Iter<Vec<T>>;

    /// Lists of at least `min_size` elements
    fn lists_at_least<T: Clone + 'static>(&self, min_size: usize, xs: Iter<T>) -> Iter<Vec<T>>;

    fn strings_of_size_over(&self, size: usize, alphabet: Iter<char>) -> Iter<String> {
        to_strings(self.lists_of_size(size, alphabet))
    }

    fn strings_of_size(&self, size: usize) -> Iter<String> {
        self.strings_of_size_over(size, self.characters())
    }

    fn strings_over(&self, alphabet: Iter<char>) -> Iter<String> {
        to_strings(self.lists(alphabet))
    }

    fn strings(&self) -> Iter<String> {
        self.strings_over(self.characters())
    }

    fn strings_at_least_over(&self, min_size: usize, alphabet: Iter<char>) -> Iter<String> {
        to_strings(self.lists_at_least(min_size, alphabet))
    }

    fn strings_at_least(&self, min_size: usize) -> Iter<String> {
        self.strings_at_least_over(min_size, self.characters())
    }
}
