//! Cache of entries retired by a soft reset, kept apart from the live slots.

use std::collections::VecDeque;

use crate::config::ReusePolicy;
use crate::data::{Data, DataKind};

#[derive(Debug)]
pub(crate) struct ReusePool {
    /// Front is the entry that sat at the lowest index when it was retired.
    cached: VecDeque<Data>,
    policy: ReusePolicy,
    evictions: u64,
}

impl ReusePool {
    pub(crate) fn new(policy: ReusePolicy) -> Self {
        Self {
            cached: VecDeque::new(),
            policy,
            evictions: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.cached.len()
    }

    #[inline]
    pub(crate) fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Put retired entries ahead of anything cached earlier, keeping their order.
    ///
    /// At most `room` entries are kept; the oldest go first.
    pub(crate) fn stash(&mut self, retired: Vec<Data>, room: usize) {
        if self.policy == ReusePolicy::Disabled {
            return;
        }
        for entry in retired.into_iter().rev() {
            self.cached.push_front(entry);
        }
        self.truncate(room);
    }

    /// Release the front entry to make way for an entry built elsewhere.
    ///
    /// Only `Adjacent` ties the front to the next free slot.
    pub(crate) fn displace(&mut self) {
        if self.policy != ReusePolicy::Adjacent {
            return;
        }
        if let Some(front) = self.cached.pop_front() {
            log::trace!("releasing cached {} entry on insert", front.kind());
            self.evictions += 1;
        }
    }

    /// Drop the oldest entries until at most `room` remain.
    pub(crate) fn truncate(&mut self, room: usize) {
        if self.cached.len() > room {
            let dropped = self.cached.len() - room;
            log::trace!("releasing {dropped} cached entries over the free slot count");
            self.evictions += dropped as u64;
            self.cached.truncate(room);
        }
    }

    /// Hand out a cached entry of `kind`, if the policy finds one.
    pub(crate) fn take(&mut self, kind: DataKind) -> Option<Data> {
        match self.policy {
            ReusePolicy::Disabled => None,
            ReusePolicy::Adjacent => {
                let front = self.cached.pop_front()?;
                if front.kind() == kind {
                    return Some(front);
                }
                log::trace!(
                    "evicting cached {} entry, wanted {}",
                    front.kind(),
                    kind
                );
                self.evictions += 1;
                None
            }
            ReusePolicy::Scan => {
                let pos = self.cached.iter().position(|d| d.kind() == kind)?;
                self.cached.remove(pos)
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cached.clear();
    }
}
