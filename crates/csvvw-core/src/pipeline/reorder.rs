//! Reorders results that arrive out of sequence.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Item tagged with the sequence number of its input row.
#[derive(Debug)]
struct Sequenced<T> {
    seq: u64,
    item: T,
}

impl<T> PartialEq for Sequenced<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T> Eq for Sequenced<T> {}

impl<T> PartialOrd for Sequenced<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Sequenced<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seq.cmp(&other.seq)
    }
}

/// Min-heap keyed on sequence number that releases items strictly in order.
///
/// Sequence numbers start at zero and must be unique.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    next: u64,
    pending: BinaryHeap<Reverse<Sequenced<T>>>,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Holds `item` until every lower sequence number was released.
    pub fn push(&mut self, seq: u64, item: T) {
        self.pending.push(Reverse(Sequenced { seq, item }));
    }

    /// Releases the next item if it has arrived.
    pub fn pop_ready(&mut self) -> Option<T> {
        let Reverse(head) = self.pending.peek()?;
        if head.seq != self.next {
            return None;
        }
        let Reverse(head) = self.pending.pop()?;
        self.next += 1;
        Some(head.item)
    }

    /// Number of items waiting for an earlier sequence number.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
