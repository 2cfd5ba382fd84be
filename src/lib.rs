//! # kvarray
//!
//! A sorted array of keyed variant entries.
//!
//! Entries carrying a key are kept in length-major, case-insensitive order
//! and found by binary search. Entries with an empty key are list elements
//! and are appended in insertion order. The same type therefore serves as a
//! small ordered map (header sets, option tables) and as a value list.
//!
//! ## Example
//!
//! ```rust
//! use kvarray::{Array, Data};
//!
//! let mut headers = Array::new();
//! headers.insert_unique(Data::string("Accept", "text/html"));
//! headers.insert_unique(Data::string("accept", "text/plain"));
//! headers.replace(Data::string("Host", "example.org"));
//!
//! assert_eq!(headers.len(), 2);
//! assert_eq!(
//!     headers.get("ACCEPT").and_then(|d| d.as_str_bytes()),
//!     Some(&b"text/html, text/plain"[..])
//! );
//!
//! // Length-major: "Host" (4 bytes) sorts before "Accept" (6 bytes).
//! let keys: Vec<&[u8]> = headers.iter().map(|d| d.key()).collect();
//! assert_eq!(keys, [&b"Host"[..], &b"Accept"[..]]);
//! ```

mod config;
mod data;
mod error;
mod key;
mod pool;
mod print;
mod slots;

pub use config::{ArrayConfig, ReusePolicy, DEFAULT_GROW_STEP, DEFAULT_MAX_REUSE_SIZE};
pub use data::{Data, DataKind, Value};
pub use error::ArrayError;
pub use key::{caseless_eq, key_cmp, Position};

use pool::ReusePool;
use slots::SlotStore;

// =============================================================================
// Statistics
// =============================================================================

/// Entry allocation counters for an [`Array`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrayStats {
    /// Entries built from scratch by the typed insertion paths.
    pub allocations: u64,
    /// Entries taken from the reuse cache instead.
    pub reuses: u64,
    /// Cached entries released without being reused: a kind that did not
    /// fit, a slot taken by a caller-built entry, or no free slot left.
    pub evictions: u64,
    /// Entries currently held in the reuse cache. Never more than
    /// `capacity() - len()`.
    pub cached: usize,
}

enum FindOrInsert {
    Inserted,
    Occupied(usize, Data),
}

// =============================================================================
// Array
// =============================================================================

/// Sorted container of [`Data`] entries.
///
/// Keyed entries are ordered by [`key_cmp`]. Empty-keyed entries are list
/// elements and always go to the tail. An array is meant to be used either as
/// a map (all keys non-empty and distinct) or as a list (all keys empty);
/// mixing the two is not rejected, but lookups only make sense on the former.
pub struct Array {
    slots: SlotStore<Data>,
    pool: ReusePool,
    config: ArrayConfig,
    allocations: u64,
    reuses: u64,
}

impl Array {
    pub fn new() -> Self {
        Self::with_config(ArrayConfig::default())
    }

    pub fn with_config(config: ArrayConfig) -> Self {
        Self {
            slots: SlotStore::new(config.initial_capacity, config.grow_step),
            pool: ReusePool::new(config.reuse),
            config,
            allocations: 0,
            reuses: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.len() == 0
    }

    /// Slots available before the store has to grow again.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.size()
    }

    #[inline]
    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    pub fn stats(&self) -> ArrayStats {
        ArrayStats {
            allocations: self.allocations,
            reuses: self.reuses,
            evictions: self.pool.evictions(),
            cached: self.pool.len(),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Data] {
        self.slots.as_slice()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Data> {
        self.slots.as_slice().iter()
    }

    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&Data> {
        self.slots.as_slice().get(index)
    }

    /// Drop every entry, including the reuse cache.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.pool.clear();
    }

    /// Empty the array but keep its entries for reuse by later insertions.
    ///
    /// Key and string buffers larger than [`ArrayConfig::max_reuse_size`] are
    /// released so a single oversized request does not pin its memory.
    pub fn soft_reset(&mut self) {
        let max = self.config.max_reuse_size;
        let mut shrunk = 0usize;
        let retired: Vec<Data> = self
            .slots
            .drain()
            .map(|mut d| {
                shrunk += d.shrink_buffers(max);
                d
            })
            .collect();
        log::debug!(
            "soft reset: {} entries retired, {} oversized buffers released",
            retired.len(),
            shrunk
        );
        let room = self.slots.size();
        self.pool.stash(retired, room);
    }

    /// Replace the contents with deep copies of `src`'s entries.
    ///
    /// `src` is already ordered, so entries are appended as they are.
    pub fn copy_from(&mut self, src: &Array) {
        self.clear();
        self.slots.reserve(src.len());
        for entry in src.iter() {
            let tail = self.slots.len();
            self.insert_built(tail, entry.clone());
        }
    }
}

// =============================================================================
// Lookup
// =============================================================================

impl Array {
    /// Binary search for `key`.
    pub fn locate(&self, key: impl AsRef<[u8]>) -> Position {
        let slots = self.slots.as_slice();
        key::search(slots.len(), key.as_ref(), |i| slots[i].key())
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Data> {
        let i = self.locate(key).found()?;
        self.slots.as_slice().get(i)
    }

    /// Mutable access to the value stored under `key`. The key is not exposed,
    /// so the order cannot be broken through it.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut Value> {
        let i = self.locate(key).found()?;
        self.slots.as_mut_slice().get_mut(i).map(Data::value_mut)
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.locate(key).found().is_some()
    }
}

// =============================================================================
// Insertion
// =============================================================================

impl Array {
    /// Fresh entry shell of `kind` under `key`, from the reuse cache if possible.
    fn new_entry(&mut self, kind: DataKind, key: &[u8]) -> Data {
        match self.pool.take(kind) {
            Some(mut entry) => {
                entry.recycle(key);
                self.reuses += 1;
                entry
            }
            None => {
                self.allocations += 1;
                Data::new(key.to_vec(), Value::empty(kind))
            }
        }
    }

    /// Insert an entry that came out of `new_entry`. Its cache slot
    /// was already consumed there.
    fn insert_recycled(&mut self, pos: usize, entry: Data) {
        self.slots.insert(pos, entry);
        self.pool.truncate(self.slots.size() - self.slots.len());
    }

    /// Insert an entry built by the caller. It takes the slot the next cached
    /// entry would have been reused from.
    fn insert_built(&mut self, pos: usize, entry: Data) {
        self.pool.displace();
        self.insert_recycled(pos, entry);
    }

    fn find_or_insert(&mut self, entry: Data) -> FindOrInsert {
        if entry.key().is_empty() {
            let tail = self.slots.len();
            self.insert_built(tail, entry);
            return FindOrInsert::Inserted;
        }
        match self.locate(entry.key()) {
            Position::Found(i) => FindOrInsert::Occupied(i, entry),
            Position::NotFound(p) => {
                self.insert_built(p, entry);
                FindOrInsert::Inserted
            }
        }
    }

    /// Index of the `kind` entry for `key`, inserting an empty one if absent.
    fn slot_for(&mut self, key: &[u8], kind: DataKind) -> Result<usize, ArrayError> {
        match self.locate(key) {
            Position::Found(i) => {
                let existing = &self.slots.as_slice()[i];
                if existing.kind() != kind {
                    return Err(ArrayError::kind_mismatch(
                        existing.key(),
                        existing.kind(),
                        kind,
                    ));
                }
                Ok(i)
            }
            Position::NotFound(p) => {
                let entry = self.new_entry(kind, key);
                self.insert_recycled(p, entry);
                Ok(p)
            }
        }
    }

    /// Integer stored under `key`, created as `0` when absent.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds a non-integer entry.
    pub fn get_int_mut(&mut self, key: impl AsRef<[u8]>) -> &mut i64 {
        match self.try_get_int_mut(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::KindMismatch`] if `key` holds a non-integer entry.
    pub fn try_get_int_mut(&mut self, key: impl AsRef<[u8]>) -> Result<&mut i64, ArrayError> {
        let pos = self.slot_for(key.as_ref(), DataKind::Integer)?;
        match self.slots.as_mut_slice()[pos].value_mut() {
            Value::Integer(v) => Ok(v),
            _ => unreachable!("slot_for checked the kind"),
        }
    }

    /// String value stored under `key`, created empty when absent.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds a non-string entry.
    pub fn get_buf_mut(&mut self, key: impl AsRef<[u8]>) -> &mut Vec<u8> {
        match self.try_get_buf_mut(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::KindMismatch`] if `key` holds a non-string entry.
    pub fn try_get_buf_mut(
        &mut self,
        key: impl AsRef<[u8]>,
    ) -> Result<&mut Vec<u8>, ArrayError> {
        let pos = self.slot_for(key.as_ref(), DataKind::String)?;
        match self.slots.as_mut_slice()[pos].value_mut() {
            Value::String(v) => Ok(v),
            _ => unreachable!("slot_for checked the kind"),
        }
    }

    /// Append a keyless string element (list mode).
    pub fn insert_value(&mut self, value: impl AsRef<[u8]>) {
        let mut entry = self.new_entry(DataKind::String, b"");
        if let Value::String(s) = entry.value_mut() {
            s.extend_from_slice(value.as_ref());
        }
        let tail = self.slots.len();
        self.insert_recycled(tail, entry);
    }

    /// Append `entry` at the tail without consulting its key.
    pub fn push(&mut self, entry: Data) {
        let tail = self.slots.len();
        self.insert_built(tail, entry);
    }

    /// Insert `entry`, displacing any entry with the same key.
    ///
    /// Returns the displaced entry. Empty-keyed entries are appended.
    pub fn replace(&mut self, entry: Data) -> Option<Data> {
        match self.find_or_insert(entry) {
            FindOrInsert::Inserted => None,
            FindOrInsert::Occupied(i, entry) => Some(self.slots.replace(i, entry)),
        }
    }

    /// Insert `entry`, or merge it into the entry already stored under its key.
    ///
    /// See [`Data::merge_duplicate`] for the merge rules.
    ///
    /// # Panics
    ///
    /// Panics if the stored entry is of a different kind.
    pub fn insert_unique(&mut self, entry: Data) {
        if let Err(e) = self.try_insert_unique(entry) {
            panic!("{e}");
        }
    }

    /// # Errors
    ///
    /// Returns [`ArrayError::KindMismatch`] if the stored entry is of a
    /// different kind. The array is left unchanged and `entry` is dropped.
    pub fn try_insert_unique(&mut self, entry: Data) -> Result<(), ArrayError> {
        match self.find_or_insert(entry) {
            FindOrInsert::Inserted => Ok(()),
            FindOrInsert::Occupied(i, entry) => {
                let existing = &mut self.slots.as_mut_slice()[i];
                if existing.kind() != entry.kind() {
                    return Err(ArrayError::kind_mismatch(
                        existing.key(),
                        existing.kind(),
                        entry.kind(),
                    ));
                }
                existing.merge_duplicate(entry);
                Ok(())
            }
        }
    }

    /// Remove the entry for `key` and hand it to the caller.
    pub fn extract(&mut self, key: impl AsRef<[u8]>) -> Option<Data> {
        let i = self.locate(key).found()?;
        Some(self.slots.remove(i))
    }
}

// =============================================================================
// Matching
// =============================================================================

// Linear scans in index order; the first hit wins.
impl Array {
    /// First entry whose key is a prefix of `subject`.
    pub fn match_key_prefix(&self, subject: impl AsRef<[u8]>) -> Option<&Data> {
        let subject = subject.as_ref();
        self.iter().find(|d| key::is_prefix(subject, d.key()))
    }

    pub fn match_key_prefix_nc(&self, subject: impl AsRef<[u8]>) -> Option<&Data> {
        let subject = subject.as_ref();
        self.iter().find(|d| key::is_prefix_nc(subject, d.key()))
    }

    /// First entry whose key is a suffix of `subject`.
    pub fn match_key_suffix(&self, subject: impl AsRef<[u8]>) -> Option<&Data> {
        let subject = subject.as_ref();
        self.iter().find(|d| key::is_suffix(subject, d.key()))
    }

    pub fn match_key_suffix_nc(&self, subject: impl AsRef<[u8]>) -> Option<&Data> {
        let subject = subject.as_ref();
        self.iter().find(|d| key::is_suffix_nc(subject, d.key()))
    }

    /// First string value that is a prefix of `subject`. Other kinds are skipped.
    pub fn match_value_prefix(&self, subject: impl AsRef<[u8]>) -> Option<&[u8]> {
        let subject = subject.as_ref();
        self.iter()
            .filter_map(Data::as_str_bytes)
            .find(|v| key::is_prefix(subject, v))
    }

    pub fn match_value_prefix_nc(&self, subject: impl AsRef<[u8]>) -> Option<&[u8]> {
        let subject = subject.as_ref();
        self.iter()
            .filter_map(Data::as_str_bytes)
            .find(|v| key::is_prefix_nc(subject, v))
    }

    pub fn match_value_suffix(&self, subject: impl AsRef<[u8]>) -> Option<&[u8]> {
        let subject = subject.as_ref();
        self.iter()
            .filter_map(Data::as_str_bytes)
            .find(|v| key::is_suffix(subject, v))
    }

    pub fn match_value_suffix_nc(&self, subject: impl AsRef<[u8]>) -> Option<&[u8]> {
        let subject = subject.as_ref();
        self.iter()
            .filter_map(Data::as_str_bytes)
            .find(|v| key::is_suffix_nc(subject, v))
    }

    /// First entry matching `subject` as `"/path"` prefix or `".ext"` suffix.
    ///
    /// Keys starting with `/` are tested as prefixes, all others as suffixes.
    pub fn match_path_or_ext(&self, subject: impl AsRef<[u8]>) -> Option<&Data> {
        let subject = subject.as_ref();
        self.iter().find(|d| {
            let k = d.key();
            if k.first() == Some(&b'/') {
                key::is_prefix(subject, k)
            } else {
                key::is_suffix(subject, k)
            }
        })
    }
}

// =============================================================================
// Shape predicates
// =============================================================================

impl Array {
    /// Keyless list of strings.
    pub fn is_vlist(&self) -> bool {
        self.iter()
            .all(|d| d.key().is_empty() && d.kind() == DataKind::String)
    }

    /// Every entry has a key.
    pub fn is_kvany(&self) -> bool {
        self.iter().all(|d| !d.key().is_empty())
    }

    /// Keyed entries holding nested arrays only.
    pub fn is_kvarray(&self) -> bool {
        self.iter()
            .all(|d| !d.key().is_empty() && d.kind() == DataKind::Array)
    }

    /// Keyed entries holding strings only.
    pub fn is_kvstring(&self) -> bool {
        self.iter()
            .all(|d| !d.key().is_empty() && d.kind() == DataKind::String)
    }

    pub fn max_key_length(&self) -> usize {
        self.iter().map(|d| d.key().len()).max().unwrap_or(0)
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Array {
    /// Deep copy of the logical entries. The reuse cache is not copied.
    fn clone(&self) -> Self {
        let mut copy = Array::with_config(self.config.clone());
        copy.copy_from(self);
        copy
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl std::fmt::Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Data;
    type IntoIter = std::slice::Iter<'a, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod proptests;
