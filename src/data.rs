//! Keyed variant entries stored in an [`Array`].
//!
//! An entry owns its key and its payload. The payload kinds form a closed set,
//! so the per-kind behaviour (copy, duplicate merge, printing) is an
//! exhaustive `match` rather than dynamic dispatch.

use crate::Array;

/// Discriminator of the payload held by a [`Data`] entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum DataKind {
    String,
    Integer,
    Array,
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataKind::String => "string",
            DataKind::Integer => "integer",
            DataKind::Array => "array",
        })
    }
}

/// Payload of an entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(Vec<u8>),
    Integer(i64),
    Array(Array),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> DataKind {
        match self {
            Value::String(_) => DataKind::String,
            Value::Integer(_) => DataKind::Integer,
            Value::Array(_) => DataKind::Array,
        }
    }

    /// Empty payload of the given kind.
    pub fn empty(kind: DataKind) -> Self {
        match kind {
            DataKind::String => Value::String(Vec::new()),
            DataKind::Integer => Value::Integer(0),
            DataKind::Array => Value::Array(Array::new()),
        }
    }
}

/// One stored item: a key (empty for list elements) and its payload.
///
/// The key cannot be changed once the entry is built, since the owning array
/// orders entries by it.
#[derive(Clone, Debug, PartialEq)]
pub struct Data {
    key: Vec<u8>,
    value: Value,
}

impl Data {
    pub fn new(key: impl Into<Vec<u8>>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn integer(key: impl Into<Vec<u8>>, value: i64) -> Self {
        Self::new(key, Value::Integer(value))
    }

    pub fn array(key: impl Into<Vec<u8>>, value: Array) -> Self {
        Self::new(key, Value::Array(value))
    }

    #[inline]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> DataKind {
        self.value.kind()
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn into_parts(self) -> (Vec<u8>, Value) {
        (self.key, self.value)
    }

    #[inline]
    pub fn as_str_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match &self.value {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Fold a second entry with the same key into this one.
    ///
    /// Strings accumulate as a `", "`-separated list; integers and arrays keep
    /// the value already stored. Both entries must be of the same kind.
    pub fn merge_duplicate(&mut self, incoming: Data) {
        assert_eq!(
            self.kind(),
            incoming.kind(),
            "duplicate merge across kinds"
        );
        match (&mut self.value, incoming.value) {
            (Value::String(dst), Value::String(src)) => {
                if dst.is_empty() {
                    *dst = src;
                } else {
                    dst.extend_from_slice(b", ");
                    dst.extend_from_slice(&src);
                }
            }
            (Value::Integer(_), Value::Integer(_)) => {}
            (Value::Array(_), Value::Array(_)) => {}
            _ => unreachable!(),
        }
    }

    /// Reset this entry in place for reuse under a new key.
    ///
    /// Buffers keep their allocation.
    pub(crate) fn recycle(&mut self, key: &[u8]) {
        self.key.clear();
        self.key.extend_from_slice(key);
        match &mut self.value {
            Value::String(s) => s.clear(),
            Value::Integer(i) => *i = 0,
            Value::Array(a) => a.clear(),
        }
    }

    /// Drop key and string buffers whose capacity is above `max`.
    ///
    /// Returns the number of buffers released.
    pub(crate) fn shrink_buffers(&mut self, max: usize) -> usize {
        let mut released = 0;
        if self.key.capacity() > max {
            self.key = Vec::new();
            released += 1;
        }
        if let Value::String(s) = &mut self.value {
            if s.capacity() > max {
                *s = Vec::new();
                released += 1;
            }
        }
        released
    }
}
