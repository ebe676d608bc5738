//! Dovetailed enumeration of pairs, tuples, lists and strings.
//!
//! A dovetailer walks a natural-number counter `z` and demultiplexes each
//! value into one index per component, so every finite combination of
//! component indices comes up after finitely many steps. Components are
//! [`SharedSource`]s, which give random access into sequences that may be
//! infinite.
//!
//! Indices past the end of a finite component are skipped. Once a component
//! is known to be finite, the dovetailer switches to sweeping the other
//! dimension one slice at a time and drops every combination whose counter
//! value was already passed. The pairing functions are monotone in each
//! argument, so "already emitted" is exactly "encodes below the counter at
//! the switch".

use std::num::NonZeroU32;

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::error::Result;
use crate::ints::{
    check_shares, deinterleave_pair, demux, interleave_pair, logarithmic_demux, logarithmic_mux,
    mux, share,
};
use crate::iterables::{Iter, SharedSource};
use crate::strings::collect_string;

/// How a pair dovetailer splits its counter between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// `z = ((2x + 1) * 2^y) - 1`: the second component grows like the log
    /// of the first.
    Logarithmic,
    /// Bit interleaving with `x_share` bits of the first component for every
    /// `y_share` bits of the second.
    Ratio(NonZeroU32, NonZeroU32),
}

impl Pairing {
    pub const BALANCED: Pairing = Pairing::Ratio(share(1), share(1));
    pub const SQUARE_ROOT: Pairing = Pairing::Ratio(share(2), share(1));

    /// A ratio pairing reduced to lowest terms. Both shares must be positive.
    pub fn ratio(x_share: u32, y_share: u32) -> Result<Pairing> {
        check_shares(x_share, y_share)?;
        let divisor = x_share.gcd(&y_share);
        let (x_share, y_share) = check_shares(x_share / divisor, y_share / divisor)?;
        Ok(Pairing::Ratio(x_share, y_share))
    }

    fn demux(self, z: &BigUint) -> (BigUint, BigUint) {
        match self {
            Pairing::Logarithmic => {
                let (x, y) = logarithmic_demux(z);
                (x, BigUint::from(y))
            }
            Pairing::Ratio(x_share, y_share) => deinterleave_pair(x_share, y_share, z),
        }
    }

    /// Whether the pair `(i, j)` encodes to a counter value below `limit`.
    fn encodes_below(self, i: usize, j: usize, limit: &BigUint) -> bool {
        let i = BigUint::from(i);
        match self {
            Pairing::Logarithmic => match u32::try_from(j) {
                Ok(j) => logarithmic_mux(&i, j).map_or(false, |z| &z < limit),
                Err(_) => false,
            },
            Pairing::Ratio(x_share, y_share) => {
                &interleave_pair(x_share, y_share, &i, &BigUint::from(j)) < limit
            }
        }
    }
}

// Tuple pairings give each leaf component an equal share of the counter.
const TRIPLE: Pairing = Pairing::Ratio(share(1), share(2));
const QUINTUPLE: Pairing = Pairing::Ratio(share(3), share(2));
const SEPTUPLE: Pairing = Pairing::Ratio(share(4), share(3));

fn to_index(n: &BigUint) -> Option<usize> {
    n.to_usize()
}

enum PairState {
    Dovetail {
        z: BigUint,
    },
    /// The first component has `size` elements: walk rows of the second.
    SweepSecond {
        size: usize,
        row: usize,
        column: usize,
        limit: BigUint,
    },
    /// The second component has `size` elements: walk rows of the first.
    SweepFirst {
        size: usize,
        row: usize,
        column: usize,
        limit: BigUint,
    },
    Done,
}

struct PairDovetail<A, B> {
    xs: SharedSource<A>,
    ys: SharedSource<B>,
    pairing: Pairing,
    state: PairState,
}

impl<A: Clone + 'static, B: Clone + 'static> PairDovetail<A, B> {
    fn step(&mut self) -> Option<Option<(A, B)>> {
        match &mut self.state {
            PairState::Dovetail { z } => {
                if let Some(size) = self.xs.known_size() {
                    debug!("first pair component is finite ({} elements), sweeping", size);
                    let limit = z.clone();
                    self.state = PairState::SweepSecond {
                        size,
                        row: 0,
                        column: 0,
                        limit,
                    };
                    return Some(None);
                }
                if let Some(size) = self.ys.known_size() {
                    debug!("second pair component is finite ({} elements), sweeping", size);
                    let limit = z.clone();
                    self.state = PairState::SweepFirst {
                        size,
                        row: 0,
                        column: 0,
                        limit,
                    };
                    return Some(None);
                }
                let (i, j) = self.pairing.demux(z);
                *z += 1u32;
                let (i, j) = match (to_index(&i), to_index(&j)) {
                    (Some(i), Some(j)) => (i, j),
                    _ => return Some(None),
                };
                let x = match self.xs.get(i) {
                    Some(x) => x,
                    None => return Some(None),
                };
                match self.ys.get(j) {
                    Some(y) => Some(Some((x, y))),
                    None => Some(None),
                }
            }
            PairState::SweepSecond {
                size,
                row,
                column,
                limit,
            } => {
                if *size == 0 {
                    self.state = PairState::Done;
                    return None;
                }
                if *column == *size {
                    *column = 0;
                    *row += 1;
                }
                let (i, j) = (*column, *row);
                *column += 1;
                let y = match self.ys.get(j) {
                    Some(y) => y,
                    None => {
                        self.state = PairState::Done;
                        return None;
                    }
                };
                if self.pairing.encodes_below(i, j, limit) {
                    return Some(None);
                }
                Some(self.xs.get(i).map(|x| (x, y)))
            }
            PairState::SweepFirst {
                size,
                row,
                column,
                limit,
            } => {
                if *size == 0 {
                    self.state = PairState::Done;
                    return None;
                }
                if *column == *size {
                    *column = 0;
                    *row += 1;
                }
                let (i, j) = (*row, *column);
                *column += 1;
                let x = match self.xs.get(i) {
                    Some(x) => x,
                    None => {
                        self.state = PairState::Done;
                        return None;
                    }
                };
                if self.pairing.encodes_below(i, j, limit) {
                    return Some(None);
                }
                Some(self.ys.get(j).map(|y| (x, y)))
            }
            PairState::Done => None,
        }
    }
}

impl<A: Clone + 'static, B: Clone + 'static> Iterator for PairDovetail<A, B> {
    type Item = (A, B);

    fn next(&mut self) -> Option<(A, B)> {
        loop {
            match self.step()? {
                Some(pair) => return Some(pair),
                None => continue,
            }
        }
    }
}

/// All pairs from `xs` and `ys`, ordered by `pairing`.
pub fn pairs_with<A, B>(pairing: Pairing, xs: SharedSource<A>, ys: SharedSource<B>) -> Iter<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    Box::new(PairDovetail {
        xs,
        ys,
        pairing,
        state: PairState::Dovetail { z: BigUint::zero() },
    })
}

pub fn pairs<A: Clone + 'static, B: Clone + 'static>(xs: SharedSource<A>, ys: SharedSource<B>) -> Iter<(A, B)> {
    pairs_with(Pairing::BALANCED, xs, ys)
}

pub fn pairs_logarithmic<A: Clone + 'static, B: Clone + 'static>(
    xs: SharedSource<A>,
    ys: SharedSource<B>,
) -> Iter<(A, B)> {
    pairs_with(Pairing::Logarithmic, xs, ys)
}

pub fn pairs_square_root<A: Clone + 'static, B: Clone + 'static>(
    xs: SharedSource<A>,
    ys: SharedSource<B>,
) -> Iter<(A, B)> {
    pairs_with(Pairing::SQUARE_ROOT, xs, ys)
}

// Larger tuples nest pair dovetailers. Each pairing ratio matches the arity
// of its two halves, so every component gets the same share of counter bits.

pub fn triples<A, B, C>(a: SharedSource<A>, b: SharedSource<B>, c: SharedSource<C>) -> Iter<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let bc = SharedSource::new(pairs(b, c));
    Box::new(pairs_with(TRIPLE, a, bc).map(|(a, (b, c))| (a, b, c)))
}

pub fn quadruples<A, B, C, D>(
    a: SharedSource<A>,
    b: SharedSource<B>,
    c: SharedSource<C>,
    d: SharedSource<D>,
) -> Iter<(A, B, C, D)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    let ab = SharedSource::new(pairs(a, b));
    let cd = SharedSource::new(pairs(c, d));
    Box::new(pairs(ab, cd).map(|((a, b), (c, d))| (a, b, c, d)))
}

pub fn quintuples<A, B, C, D, E>(
    a: SharedSource<A>,
    b: SharedSource<B>,
    c: SharedSource<C>,
    d: SharedSource<D>,
    e: SharedSource<E>,
) -> Iter<(A, B, C, D, E)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    E: Clone + 'static,
{
    let abc = SharedSource::new(triples(a, b, c));
    let de = SharedSource::new(pairs(d, e));
    Box::new(pairs_with(QUINTUPLE, abc, de).map(|((a, b, c), (d, e))| (a, b, c, d, e)))
}

pub fn sextuples<A, B, C, D, E, F>(
    a: SharedSource<A>,
    b: SharedSource<B>,
    c: SharedSource<C>,
    d: SharedSource<D>,
    e: SharedSource<E>,
    f: SharedSource<F>,
) -> Iter<(A, B, C, D, E, F)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    E: Clone + 'static,
    F: Clone + 'static,
{
    let abc = SharedSource::new(triples(a, b, c));
    let def = SharedSource::new(triples(d, e, f));
    Box::new(pairs(abc, def).map(|((a, b, c), (d, e, f))| (a, b, c, d, e, f)))
}

#[allow(clippy::too_many_arguments)]
pub fn septuples<A, B, C, D, E, F, G>(
    a: SharedSource<A>,
    b: SharedSource<B>,
    c: SharedSource<C>,
    d: SharedSource<D>,
    e: SharedSource<E>,
    f: SharedSource<F>,
    g: SharedSource<G>,
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
    let abcd = SharedSource::new(quadruples(a, b, c, d));
    let efg = SharedSource::new(triples(e, f, g));
    Box::new(
        pairs_with(SEPTUPLE, abcd, efg)
            .map(|((a, b, c, d), (e, f, g))| (a, b, c, d, e, f, g)),
    )
}

/// All lists of exactly `size` elements of `xs`.
pub fn lists_of_size<T: Clone + 'static>(size: usize, xs: SharedSource<T>) -> Iter<Vec<T>> {
    match size {
        0 => Box::new(std::iter::once(Vec::new())),
        1 => Box::new(xs.iter().map(|x| vec![x])),
        _ => {
            let right = size / 2;
            let left = size - right;
            let lefts = SharedSource::new(lists_of_size(left, xs.clone()));
            let rights = SharedSource::new(lists_of_size(right, xs));
            // Both halves are non-empty once size is at least 2.
            let pairing = Pairing::ratio(left as u32, right as u32).unwrap_or(Pairing::BALANCED);
            Box::new(pairs_with(pairing, lefts, rights).map(|(mut left, right)| {
                left.extend(right);
                left
            }))
        }
    }
}

/// Index lists in shortlex order over an alphabet of `size` symbols: the
/// empty list, then every list of length 1, then length 2, and so on.
struct ShortlexIndices {
    size: usize,
    current: Option<Vec<usize>>,
}

impl ShortlexIndices {
    fn new(size: usize) -> Self {
        ShortlexIndices {
            size,
            current: Some(Vec::new()),
        }
    }
}

impl Iterator for ShortlexIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        if self.size > 0 {
            let mut successor = current.clone();
            let mut position = successor.len();
            loop {
                if position == 0 {
                    successor = vec![0; current.len() + 1];
                    break;
                }
                position -= 1;
                successor[position] += 1;
                if successor[position] < self.size {
                    break;
                }
                successor[position] = 0;
            }
            self.current = Some(successor);
        }
        Some(current)
    }
}

/// Counter value at which the variable-length dovetailer emits the list with
/// these indices, or `None` if it is out of reach.
fn list_code(indices: &[usize]) -> Option<BigUint> {
    if indices.is_empty() {
        return Some(BigUint::zero());
    }
    let components: Vec<BigUint> = indices.iter().map(|&i| BigUint::from(i)).collect();
    let length = u32::try_from(indices.len() - 1).ok()?;
    logarithmic_mux(&mux(&components), length).ok().map(|code| code + 1u32)
}

/// How many elements `lists` reads before its first list. A source that ends
/// within this prefix is listed in shortlex order from the start.
const SMALL_ALPHABET: usize = 64;

enum ListState {
    Dovetail { z: BigUint },
    Shortlex { indices: ShortlexIndices, limit: BigUint },
}

struct ListDovetail<T> {
    xs: SharedSource<T>,
    state: ListState,
}

impl<T: Clone + 'static> ListDovetail<T> {
    fn step(&mut self) -> Option<Option<Vec<T>>> {
        match &mut self.state {
            ListState::Dovetail { z } => {
                if z.is_zero() {
                    let _ = self.xs.get(SMALL_ALPHABET);
                }
                if let Some(size) = self.xs.known_size() {
                    debug!("list elements are finite ({} elements), switching to shortlex", size);
                    let limit = z.clone();
                    self.state = ListState::Shortlex {
                        indices: ShortlexIndices::new(size),
                        limit,
                    };
                    return Some(None);
                }
                if z.is_zero() {
                    *z += 1u32;
                    return Some(Some(Vec::new()));
                }
                let (x, y) = logarithmic_demux(&(&*z - 1u32));
                *z += 1u32;
                let components = match demux(y as usize + 1, &x) {
                    Ok(components) => components,
                    Err(_) => return Some(None),
                };
                let list: Option<Vec<T>> = components
                    .iter()
                    .map(|i| to_index(i).and_then(|i| self.xs.get(i)))
                    .collect();
                Some(list)
            }
            ListState::Shortlex { indices, limit } => {
                let next = indices.next()?;
                let emitted = list_code(&next).map_or(false, |code| code < *limit);
                if emitted {
                    return Some(None);
                }
                Some(next.iter().map(|&i| self.xs.get(i)).collect())
            }
        }
    }
}

impl<T: Clone + 'static> Iterator for ListDovetail<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        loop {
            if let Some(list) = self.step()? {
                return Some(list);
            }
        }
    }
}

/// All finite lists of elements of `xs`. Lengths grow like the log of the
/// position. An `xs` of at most [`SMALL_ALPHABET`] elements gives shortlex
/// order throughout; a longer finite `xs` falls back to shortlex once its end
/// is seen. The first pull reads up to `SMALL_ALPHABET + 1` elements.
pub fn lists<T: Clone + 'static>(xs: SharedSource<T>) -> Iter<Vec<T>> {
    Box::new(ListDovetail {
        xs,
        state: ListState::Dovetail { z: BigUint::zero() },
    })
}

/// All lists with at least `min_size` elements of `xs`.
pub fn lists_at_least<T: Clone + 'static>(min_size: usize, xs: SharedSource<T>) -> Iter<Vec<T>> {
    if min_size == 0 {
        return lists(xs);
    }
    let prefixes = SharedSource::new(lists_of_size(min_size, xs.clone()));
    let suffixes = SharedSource::new(lists(xs));
    Box::new(pairs(prefixes, suffixes).map(|(mut prefix, suffix)| {
        prefix.extend(suffix);
        prefix
    }))
}

/// All finite lists over a finite alphabet in shortlex order. The alphabet
/// is read in full on the first pull, so `xs` must be finite.
pub fn lists_shortlex<T: Clone + 'static>(xs: Iter<T>) -> Iter<Vec<T>> {
    let mut pending = Some(xs);
    let mut alphabet: Vec<T> = Vec::new();
    let mut indices = ShortlexIndices::new(0);
    Box::new(std::iter::from_fn(move || {
        if let Some(xs) = pending.take() {
            alphabet = xs.collect();
            indices = ShortlexIndices::new(alphabet.len());
        }
        let next = indices.next()?;
        Some(next.iter().map(|&i| alphabet[i].clone()).collect())
    }))
}

pub fn strings_of_size(size: usize, alphabet: SharedSource<char>) -> Iter<String> {
    Box::new(lists_of_size(size, alphabet).map(collect_string))
}

pub fn strings(alphabet: SharedSource<char>) -> Iter<String> {
    Box::new(lists(alphabet).map(collect_string))
}

pub fn strings_at_least(min_size: usize, alphabet: SharedSource<char>) -> Iter<String> {
    Box::new(lists_at_least(min_size, alphabet).map(collect_string))
}

pub fn strings_shortlex(alphabet: Iter<char>) -> Iter<String> {
    Box::new(lists_shortlex(alphabet).map(collect_string))
}
