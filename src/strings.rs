// Character orders for the providers.
// The exhaustive provider walks characters either in a "friendly" order that
// reaches letters and digits before punctuation and control characters, or
// in raw code-point order. Range queries always use code-point order.

use once_cell::sync::Lazy;

use crate::iterables::{boxed, Iter};

/// Count of Unicode scalar values (code points minus the surrogate block).
pub const SCALAR_VALUE_COUNT: u32 = 0x11_0000 - SURROGATE_COUNT;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_COUNT: u32 = 0x800;

static FRIENDLY_ASCII: Lazy<Vec<char>> = Lazy::new(|| {
    let mut order = Vec::with_capacity(128);
    order.extend('a'..='z');
    order.extend('A'..='Z');
    order.extend('0'..='9');
    order.extend((' '..='~').filter(|c| !c.is_ascii_alphanumeric()));
    order.extend('\u{0}'..='\u{1f}');
    order.push('\u{7f}');
    order
});

/// All 128 ASCII characters, letters first and control characters last.
pub fn friendly_ascii() -> Iter<char> {
    boxed(FRIENDLY_ASCII.clone())
}

/// Every `char`, starting with [`friendly_ascii`] and continuing through the
/// non-ASCII scalar values in ascending order.
pub fn friendly_characters() -> Iter<char> {
    Box::new(friendly_ascii().chain('\u{80}'..=char::MAX))
}

/// Characters in `[a, b]` by code point. Empty when `a > b`.
pub fn char_range(a: char, b: char) -> Iter<char> {
    boxed(a..=b)
}

/// Characters at or above `a` by code point.
pub fn char_range_up(a: char) -> Iter<char> {
    char_range(a, char::MAX)
}

/// Characters at or below `a` by code point.
pub fn char_range_down(a: char) -> Iter<char> {
    char_range('\u{0}', a)
}

/// The scalar value at position `index` of code-point order, skipping
/// surrogates. `None` past the last scalar value.
pub fn char_at_index(index: u32) -> Option<char> {
    if index >= SCALAR_VALUE_COUNT {
        return None;
    }
    let code_point = if index >= SURROGATE_START {
        index + SURROGATE_COUNT
    } else {
        index
    };
    char::from_u32(code_point)
}

/// Position of `c` in code-point order, skipping surrogates.
pub fn char_index(c: char) -> u32 {
    let code_point = u32::from(c);
    if code_point >= SURROGATE_START {
        code_point - SURROGATE_COUNT
    } else {
        code_point
    }
}

pub fn collect_string(chars: Vec<char>) -> String {
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_friendly_ascii_order() {
        let order: Vec<char> = friendly_ascii().collect();
        assert_eq!(order.len(), 128);
        assert_eq!(&order[..3], &['a', 'b', 'c']);
        assert_eq!(order[26], 'A');
        assert_eq!(order[52], '0');
        assert_eq!(order[62], ' ');
        assert_eq!(order[63], '!');
        assert_eq!(order[95], '\u{0}');
        assert_eq!(order[127], '\u{7f}');

        let distinct: HashSet<char> = order.iter().copied().collect();
        assert_eq!(distinct.len(), 128);
        assert!(order.iter().all(|c| c.is_ascii()));
    }

    #[test]
    fn test_friendly_characters_continue_past_ascii() {
        let order: Vec<char> = friendly_characters().skip(127).take(3).collect();
        assert_eq!(order, vec!['\u{7f}', '\u{80}', '\u{81}']);
        assert_eq!(friendly_characters().count(), SCALAR_VALUE_COUNT as usize);
    }

    #[test]
    fn test_char_ranges() {
        assert_eq!(char_range('a', 'e').collect::<String>(), "abcde");
        assert_eq!(char_range('c', 'c').collect::<String>(), "c");
        assert_eq!(char_range('e', 'a').count(), 0);
        assert_eq!(char_range_down('\u{2}').count(), 3);
        assert_eq!(char_range_up('\u{10fffe}').count(), 2);
        let across: Vec<char> = char_range('\u{d7ff}', '\u{e000}').collect();
        assert_eq!(across, vec!['\u{d7ff}', '\u{e000}']);
    }

    #[test]
    fn test_char_index_skips_surrogates() {
        assert_eq!(char_at_index(0), Some('\u{0}'));
        assert_eq!(char_at_index(0xD7FF), Some('\u{d7ff}'));
        assert_eq!(char_at_index(0xD800), Some('\u{e000}'));
        assert_eq!(char_at_index(SCALAR_VALUE_COUNT - 1), Some(char::MAX));
        assert_eq!(char_at_index(SCALAR_VALUE_COUNT), None);
        for c in ['a', '\u{d7ff}', '\u{e000}', char::MAX] {
            assert_eq!(char_at_index(char_index(c)), Some(c));
        }
    }
}
