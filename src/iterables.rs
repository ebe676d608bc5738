//! Lazy sequence plumbing shared by both providers.
//!
//! Every provider output is a boxed [`Iterator`]; a fresh one is built each
//! time a provider method is called, so two calls never share a cursor.
//! Dovetailing needs random access into component sequences that may be
//! infinite, which [`CachedIterator`] provides by memoizing the prefix that
//! has been forced so far. [`SharedSource`] lets several cursors replay one
//! such cache.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

/// A boxed, owned lazy sequence.
pub type Iter<T> = Box<dyn Iterator<Item = T>>;

/// Boxes any owned iterable into an [`Iter`].
pub fn boxed<I>(xs: I) -> Iter<I::Item>
where
    I: IntoIterator,
    I::IntoIter: 'static,
{
    Box::new(xs.into_iter())
}

/// Memoizes the prefix of a sequence for repeated random access.
pub struct CachedIterator<T> {
    source: Iter<T>,
    cache: Vec<T>,
    exhausted: bool,
}

impl<T: Clone> CachedIterator<T> {
    pub fn new<I>(xs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        CachedIterator {
            source: boxed(xs),
            cache: Vec::new(),
            exhausted: false,
        }
    }

    /// Returns element `index`, forcing the source as far as needed. `None`
    /// means the sequence has fewer than `index + 1` elements.
    pub fn get(&mut self, index: usize) -> Option<T> {
        while self.cache.len() <= index {
            if self.exhausted {
                return None;
            }
            match self.source.next() {
                Some(x) => self.cache.push(x),
                None => self.exhausted = true,
            }
        }
        Some(self.cache[index].clone())
    }

    /// Looks up element `index` without forcing anything. `None` past the
    /// materialized prefix says nothing about whether the element exists.
    pub fn get_cached(&self, index: usize) -> Option<&T> {
        self.cache.get(index)
    }

    /// The length of the sequence, once its end has been observed.
    pub fn known_size(&self) -> Option<usize> {
        if self.exhausted {
            Some(self.cache.len())
        } else {
            None
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

/// A cloneable handle onto one [`CachedIterator`].
///
/// Handles are single-threaded; each cursor built from a provider owns its
/// own sources.
pub struct SharedSource<T>(Rc<RefCell<CachedIterator<T>>>);

impl<T> Clone for SharedSource<T> {
    fn clone(&self) -> Self {
        SharedSource(Rc::clone(&self.0))
    }
}

impl<T: Clone + 'static> SharedSource<T> {
    pub fn new<I>(xs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        SharedSource(Rc::new(RefCell::new(CachedIterator::new(xs))))
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.0.borrow_mut().get(index)
    }

    pub fn known_size(&self) -> Option<usize> {
        self.0.borrow().known_size()
    }

    pub fn is_empty(&self) -> bool {
        self.get(0).is_none()
    }

    /// A fresh cursor over the whole sequence, starting from element 0.
    pub fn iter(&self) -> Iter<T> {
        let source = self.clone();
        let mut index = 0;
        Box::new(std::iter::from_fn(move || {
            let x = source.get(index)?;
            index += 1;
            Some(x)
        }))
    }

    /// Repeats the sequence forever. An empty sequence stays empty.
    pub fn cycle(&self) -> Iter<T> {
        let source = self.clone();
        let mut index = 0;
        Box::new(std::iter::from_fn(move || match source.get(index) {
            Some(x) => {
                index += 1;
                Some(x)
            }
            None if index == 0 => None,
            None => {
                index = 1;
                source.get(0)
            }
        }))
    }
}

/// Alternates between two sequences, continuing with the survivor once one
/// of them ends.
pub fn interleave<T: 'static>(xs: Iter<T>, ys: Iter<T>) -> Iter<T> {
    let mut sources = [xs, ys];
    let mut turn = 0;
    let mut finished = [false, false];
    Box::new(std::iter::from_fn(move || {
        for _ in 0..2 {
            let current = turn;
            turn = 1 - turn;
            if finished[current] {
                continue;
            }
            match sources[current].next() {
                Some(x) => return Some(x),
                None => finished[current] = true,
            }
        }
        None
    }))
}

/// Groups a sequence into rows of `n` consecutive elements.
///
/// This is the demultiplex-then-zip of one stream into `n` streams: row `i`
/// holds element `i` of each of the `n` strided sub-streams. A trailing
/// incomplete row is dropped.
pub fn demux_zip<T: 'static>(n: usize, xs: Iter<T>) -> Iter<Vec<T>> {
    let mut xs = xs;
    Box::new(std::iter::from_fn(move || {
        let mut row = Vec::with_capacity(n);
        for _ in 0..n {
            row.push(xs.next()?);
        }
        Some(row)
    }))
}

/// Passes a sequence through unchanged, panicking if an element repeats.
///
/// A repeat means an enumeration broke its no-duplicates contract, which is
/// a bug in the caller's domain construction rather than a recoverable
/// condition.
pub fn unique_checked<T>(xs: Iter<T>) -> Iter<T>
where
    T: Eq + Hash + Clone + Debug + 'static,
{
    let mut seen = HashSet::new();
    let mut index = 0usize;
    Box::new(xs.map(move |x| {
        if !seen.insert(x.clone()) {
            panic!("Duplicate element {:?} at index {}", x, index);
        }
        index += 1;
        x
    }))
}
