//! Tunables for [`Array`](crate::Array).

/// Slots added each time the slot store fills up.
pub const DEFAULT_GROW_STEP: usize = 16;

/// Buffers larger than this are released rather than kept for reuse.
pub const DEFAULT_MAX_REUSE_SIZE: usize = 4 * 1024;

/// How insertions draw on entries cached by [`Array::soft_reset`](crate::Array::soft_reset).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ReusePolicy {
    /// Check only the next cached entry. A kind mismatch releases it.
    #[default]
    Adjacent,
    /// Search every cached entry for one of the required kind.
    Scan,
    /// Keep no cache.
    Disabled,
}

/// Configuration for an [`Array`](crate::Array).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayConfig {
    /// Slots available before the first growth.
    pub initial_capacity: usize,
    /// Slots added per growth.
    pub grow_step: usize,
    /// Reuse ceiling for key and string value buffers, in bytes.
    pub max_reuse_size: usize,
    pub reuse: ReusePolicy,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_GROW_STEP,
            grow_step: DEFAULT_GROW_STEP,
            max_reuse_size: DEFAULT_MAX_REUSE_SIZE,
            reuse: ReusePolicy::default(),
        }
    }
}

impl ArrayConfig {
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_grow_step(mut self, grow_step: usize) -> Self {
        self.grow_step = grow_step;
        self
    }

    pub fn with_max_reuse_size(mut self, max_reuse_size: usize) -> Self {
        self.max_reuse_size = max_reuse_size;
        self
    }

    pub fn with_reuse(mut self, reuse: ReusePolicy) -> Self {
        self.reuse = reuse;
        self
    }
}
