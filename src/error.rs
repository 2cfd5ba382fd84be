use thiserror::Error;

use crate::DataKind;

/// Contract violations reported by the `try_` entry points of [`Array`](crate::Array).
///
/// The non-`try_` counterparts panic with the same message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// A key is already stored with a payload of another kind.
    #[error("key {key:?} holds {existing}, not {incoming}")]
    KindMismatch {
        /// Key as stored, lossily decoded.
        key: String,
        existing: DataKind,
        incoming: DataKind,
    },
}

impl ArrayError {
    pub(crate) fn kind_mismatch(key: &[u8], existing: DataKind, incoming: DataKind) -> Self {
        ArrayError::KindMismatch {
            key: String::from_utf8_lossy(key).into_owned(),
            existing,
            incoming,
        }
    }
}
