//! FIFO queue of worry levels held by a single monkey.

use std::collections::VecDeque;

use num_bigint::BigUint;

/// Errors raised by queue operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Dequeue was attempted with no items left. The scheduler only dequeues
    /// while items remain, so seeing this means the round loop is broken.
    #[error("dequeue attempted on an empty item queue")]
    Empty,
}

/// Ordered items owned by exactly one monkey
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQueue {
    items: VecDeque<BigUint>,
}

impl ItemQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the back of the queue
    pub fn enqueue(&mut self, value: BigUint) {
        self.items.push_back(value);
    }

    /// Remove and return the front item
    pub fn dequeue(&mut self) -> Result<BigUint, QueueError> {
        self.items.pop_front().ok_or(QueueError::Empty)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in FIFO order, front first
    pub fn iter(&self) -> impl Iterator<Item = &BigUint> {
        self.items.iter()
    }
}

impl FromIterator<BigUint> for ItemQueue {
    fn from_iter<I: IntoIterator<Item = BigUint>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
