//! Key ordering and caseless byte comparison.
//!
//! Keys are ordered length-major: a shorter key always sorts before a longer
//! one, and keys of equal length compare byte-wise with ASCII `A`-`Z` folded
//! to lowercase. This is not lexicographic order: `"Z" < "b" < "aa"`.

use std::cmp::Ordering;

/// Result of a binary search over the sorted part of an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// The key is stored at this index.
    Found(usize),
    /// The key is absent; inserting it at this index keeps the array sorted.
    NotFound(usize),
}

impl Position {
    #[inline]
    pub fn found(self) -> Option<usize> {
        match self {
            Position::Found(i) => Some(i),
            Position::NotFound(_) => None,
        }
    }

    /// Index of the match, or the insertion point.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Position::Found(i) | Position::NotFound(i) => i,
        }
    }
}

#[inline]
fn fold(b: u8) -> u8 {
    // Only A-Z fold, so the order stays transitive for non-ASCII bytes.
    b.to_ascii_lowercase()
}

/// Byte-wise comparison of two equal-length keys with ASCII case folded.
#[inline]
fn caseless_cmp(a: &[u8], b: &[u8]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    for (&ca, &cb) in a.iter().zip(b) {
        if ca == cb {
            continue;
        }
        match fold(ca).cmp(&fold(cb)) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Length-major, case-insensitive-minor key comparison.
#[inline]
pub fn key_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| caseless_cmp(a, b))
}

/// `caseless_equal(a, b, len)` over whole slices.
#[inline]
pub fn caseless_eq(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[inline]
pub(crate) fn is_prefix(subject: &[u8], candidate: &[u8]) -> bool {
    candidate.len() <= subject.len() && subject[..candidate.len()] == *candidate
}

#[inline]
pub(crate) fn is_prefix_nc(subject: &[u8], candidate: &[u8]) -> bool {
    candidate.len() <= subject.len() && caseless_eq(&subject[..candidate.len()], candidate)
}

#[inline]
pub(crate) fn is_suffix(subject: &[u8], candidate: &[u8]) -> bool {
    candidate.len() <= subject.len() && subject[subject.len() - candidate.len()..] == *candidate
}

#[inline]
pub(crate) fn is_suffix_nc(subject: &[u8], candidate: &[u8]) -> bool {
    candidate.len() <= subject.len()
        && caseless_eq(&subject[subject.len() - candidate.len()..], candidate)
}

/// Binary search for `key` among `len` sorted keys.
///
/// Invariant: every key before `lower` compares less than `key`, every key
/// at or after `upper` compares greater. The loop ends with `lower == upper`,
/// which is the insertion point.
pub(crate) fn search<'a, F>(len: usize, key: &[u8], key_at: F) -> Position
where
    F: Fn(usize) -> &'a [u8],
{
    let mut lower = 0usize;
    let mut upper = len;
    while lower != upper {
        let mid = lower + (upper - lower) / 2;
        match key_cmp(key, key_at(mid)) {
            Ordering::Less => upper = mid,
            Ordering::Greater => lower = mid + 1,
            Ordering::Equal => return Position::Found(mid),
        }
    }
    Position::NotFound(lower)
}
